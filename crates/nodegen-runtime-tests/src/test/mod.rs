mod entity;
mod task;

use crate::{greycat::GraphBuilder, sample::sample_model::SampleModel};
use std::sync::mpsc;

/// Connected model over a fresh graph.
fn model() -> SampleModel {
    let model = SampleModel::new(GraphBuilder::new());
    let (tx, rx) = mpsc::channel();
    model.connect(move |connected| tx.send(connected).unwrap());
    assert!(rx.recv().unwrap(), "connect failed");

    model
}

/// Value handed to a callback that has already run.
fn collect<T: Send + 'static>(run: impl FnOnce(Box<dyn FnOnce(T) + Send>)) -> T {
    let (tx, rx) = mpsc::channel();
    run(Box::new(move |value| tx.send(value).unwrap()));

    rx.recv().unwrap()
}
