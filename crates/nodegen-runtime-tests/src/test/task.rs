use super::model;
use crate::{
    greycat::{Node, TaskContext, TaskFunctionSelect},
    sample::{
        person::Person,
        sample_model::SampleModel,
        task::{
            sample_task_api::{
                add_to_person_owns, create_person_node, find_all_by_email, get_real_version_node,
                set_person_name, travel_in_planned_world,
            },
            task_function_select_person::SelectPerson,
        },
        time::sample_time_helper::SampleTimeHelper,
    },
};

#[test]
fn real_version_keeps_result_order() {
    let model = model();
    let first = model.new_person(0, 0).expect("person factory");
    let second = model.new_car(0, 0).expect("car factory");

    let nodes = vec![
        Node::new(second.clone()),
        Node::new(first.clone()),
    ];
    let ctx = TaskContext::new(model.graph().clone(), 0, nodes);
    get_real_version_node().eval(ctx.clone());

    let output = ctx.output().expect("action continued");
    let ids: Vec<i64> = output.iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec![second.id(), first.id()]);
    assert_eq!(get_real_version_node().to_string(), "getRealVersionNode()");
}

#[test]
fn planned_world_is_forked_on_connect() {
    let _model = model();

    let planned = SampleModel::planned_world().expect("forked on connect");
    assert_ne!(planned, SampleModel::REAL_WORLD);
    assert_eq!(
        travel_in_planned_world().to_string(),
        format!("travelInWorld({planned})")
    );
}

#[test]
fn select_adapter_only_accepts_its_class() {
    let model = model();
    let person = model.new_person(0, 0).expect("person factory");
    person.set_name("ada".to_string());
    let car = model.new_car(0, 0).expect("car factory");
    let ctx = TaskContext::new(model.graph().clone(), 0, Vec::new());

    let select = SelectPerson(|p: &Person, _: &TaskContext| p.get_name().is_some());

    assert!(select.select(&Node::new(person), &ctx));
    assert!(!select.select(&Node::new(car), &ctx));
}

#[test]
fn task_api_serializes_host_actions() {
    assert_eq!(set_person_name("ada").to_string(), "setAttribute(name,2,ada)");
    assert_eq!(create_person_node().to_string(), "createTypedNode(sample.Person)");
    assert_eq!(add_to_person_owns("car").to_string(), "addVarToRelation(owns,car)");
    assert_eq!(find_all_by_email().to_string(), "readGlobalIndex(byEmail)");
}

#[test]
fn time_helper_counts_in_milliseconds() {
    assert_eq!(SampleTimeHelper::next_days(0, 1), 86_400_000);
    assert_eq!(SampleTimeHelper::prev_hours(SampleTimeHelper::ONE_HOUR, 1), 0);
}
