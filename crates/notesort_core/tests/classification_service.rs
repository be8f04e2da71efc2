use notesort_core::{Category, ClassificationService, CoreConfig, ServiceError};
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn open(dir: &Path) -> ClassificationService {
    ClassificationService::open(&CoreConfig::new(dir).unwrap())
}

#[test]
fn classify_requires_a_trained_model() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path());

    assert!(!service.has_model());
    assert!(matches!(
        service.classify("Buy milk"),
        Err(ServiceError::ModelUnavailable)
    ));
}

#[test]
fn bootstrap_trains_on_seed_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path());

    let report = service.bootstrap_model().unwrap();
    assert_eq!(report.examples, 9);
    assert_eq!(report.labels.len(), 3);
    assert!(report.undertrained.is_empty());

    assert_eq!(service.classify("Buy milk").unwrap(), "todo");
    assert_eq!(service.classify("Revise for the exam").unwrap(), "study");
    assert_eq!(service.classify("A new app idea").unwrap(), "ideas");
}

#[test]
fn classify_does_not_touch_storage() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path()).unwrap();
    let service = ClassificationService::open(&config);
    service.bootstrap_model().unwrap();

    service.classify("Buy milk").unwrap();
    service.classify("").unwrap();
    assert_eq!(service.feedback_count(), 0);
    assert!(!config.feedback_path().exists());
    assert!(!config.notes_dir().exists());
}

#[test]
fn persisted_model_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let service = open(dir.path());
        service.bootstrap_model().unwrap();
        service.classify("Research a startup idea").unwrap()
    };

    let reopened = open(dir.path());
    assert!(reopened.has_model());
    assert_eq!(reopened.classify("Research a startup idea").unwrap(), before);
}

#[test]
fn accepted_prediction_is_stored_without_feedback() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path());
    service.bootstrap_model().unwrap();

    let predicted = service.classify("Buy milk").unwrap();
    let index = service
        .accept_prediction("Buy milk", predicted.as_str())
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(service.notes("todo").unwrap(), vec!["Buy milk"]);
    assert_eq!(service.feedback_count(), 0);
    assert_eq!(service.last_retrain_marker(), 0);
}

#[test]
fn accepted_prediction_registers_its_category() {
    let dir = tempfile::tempdir().unwrap();
    let service = open(dir.path());

    service.accept_prediction("pack bags", "Travel").unwrap();
    assert!(service
        .categories()
        .contains(&Category::normalize("travel").unwrap()));
    assert!(matches!(
        service.accept_prediction("pack bags", "travel plans"),
        Err(ServiceError::InvalidLabel(_))
    ));
}

#[test]
fn concurrent_feedback_is_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(open(dir.path()));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for k in 0..5 {
                    service
                        .submit_feedback(&format!("worker {worker} note {k}"), "todo")
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(service.feedback_count(), 20);
    assert_eq!(service.notes("todo").unwrap().len(), 20);
    assert_eq!(service.last_retrain_marker(), 20);
    assert!(service.has_model());
}

#[test]
fn readers_keep_classifying_while_feedback_retrains() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(open(dir.path()));
    service.bootstrap_model().unwrap();

    let reader = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for _ in 0..50 {
                service.classify("Buy milk").unwrap();
            }
        })
    };
    for k in 0..10 {
        service
            .submit_feedback(&format!("shopping list {k}"), "todo")
            .unwrap();
    }
    reader.join().unwrap();

    assert_eq!(service.last_retrain_marker(), 10);
}
