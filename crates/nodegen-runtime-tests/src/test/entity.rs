use super::{collect, model};
use crate::{
    greycat::{Node, Type, TypedNode},
    sample::{car::Car, color::Color, person::Person, student::Student},
};

#[test]
fn setter_then_getter_reads_the_value_back() {
    let model = model();
    let person = model.new_person(0, 0).expect("person factory");

    assert_eq!(person.get_name(), None);
    person.set_name("ada".to_string()).set_age(36);

    assert_eq!(person.get_name().as_deref(), Some("ada"));
    assert_eq!(person.get_age(), Some(36));
}

#[test]
fn integer_attributes_keep_their_width() {
    let model = model();
    let car = model.new_car(0, 0).expect("car factory");

    car.set_seats(5).set_plate("AB-12".to_string());

    assert_eq!(car.get_seats(), Some(5_i32));
    assert_eq!(car.get_plate().as_deref(), Some("AB-12"));
}

#[test]
fn type_tags_match_the_host() {
    assert_eq!(Person::NAME_TYPE, Type::STRING);
    assert_eq!(Person::AGE_TYPE, Type::LONG);
    assert_eq!(Person::MOOD_TYPE, Type::DOUBLE);
    assert_eq!(Car::SEATS_TYPE, Type::INT);
    assert_eq!(Student::ENROLLED_TYPE, Type::BOOL);

    assert_eq!(Person::NAME, "name");
    assert_eq!(<Person as TypedNode>::NODE_NAME, "sample.Person");
}

#[test]
fn child_reads_parent_attributes() {
    let model = model();
    let student = model.new_student(0, 0).expect("student factory");

    student.set_school("MIT".to_string()).set_enrolled(true);
    student.set_name("alan".to_string());

    assert_eq!(student.get_name().as_deref(), Some("alan"));
    assert_eq!(student.get_enrolled(), Some(true));

    let found: Option<Node> = collect(|done| {
        model.graph().lookup(0, 0, student.id(), done);
    });
    let found = found.expect("stored student");
    assert!(found.downcast_ref::<Student>().is_some());
    assert!(found.downcast_ref::<Person>().is_none());
}

#[test]
fn learned_getter_never_creates_a_learner() {
    let model = model();
    let person = model.new_person(0, 0).expect("person factory");

    assert_eq!(person.get_mood(), None);
    let learners: Vec<Node> = collect(|done| person.relation(Person::MOOD, done));
    assert!(learners.is_empty());
}

#[test]
fn learned_setter_reuses_one_learner() {
    let model = model();
    let person = model.new_person(0, 0).expect("person factory");

    person.set_mood(1.5);
    assert_eq!(person.get_mood(), Some(1.5));

    person.set_mood(2.5);
    assert_eq!(person.get_mood(), Some(2.5));

    let learners: Vec<Node> = collect(|done| person.relation(Person::MOOD, done));
    assert_eq!(learners.len(), 1);
    assert_eq!(learners[0].get::<i32>("degree"), Some(2));
    assert_eq!(learners[0].get::<f64>("precision"), Some(0.5));
}

#[test]
fn enum_literals_round_trip() {
    assert_eq!(Color::from_literal("DARK_BLUE"), Some(Color::DarkBlue));
    assert_eq!(Color::DarkBlue.to_string(), "DARK_BLUE");
    assert_eq!(Color::from_literal("GREEN"), None);
}
