use celebratorica_core::{
    Category, CategoryEvent, CategoryId, CelebratoricaStore, ChannelObserver, Item, ItemEvent,
    ObjectAction, StoreError, StoreEvent,
};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

fn observed_store() -> (CelebratoricaStore, Receiver<StoreEvent>) {
    let mut store = CelebratoricaStore::open_in_memory().unwrap();
    let (observer, receiver) = ChannelObserver::new();
    store.subscribe(observer);
    (store, receiver)
}

fn drain(receiver: &Receiver<StoreEvent>) -> Vec<StoreEvent> {
    receiver.try_iter().collect()
}

#[test]
fn each_mutation_emits_one_completion_event() {
    let (store, receiver) = observed_store();

    let work = store.categories().add(&Category::new("Work")).unwrap();
    let mut renamed = work.clone();
    renamed.name = "Office".to_string();
    store.categories().update(&renamed).unwrap();
    let item = store
        .items()
        .add(&Item::new(work.id.unwrap(), "Kickoff", 1))
        .unwrap();
    store.items().remove(&item).unwrap();
    store.categories().remove(&renamed).unwrap();

    let actions: Vec<(&str, ObjectAction)> = drain(&receiver)
        .iter()
        .map(|event| (event.kind(), event.action()))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("category", ObjectAction::Added),
            ("category", ObjectAction::Edited),
            ("item", ObjectAction::Added),
            ("item", ObjectAction::Removed),
            ("category", ObjectAction::Removed),
        ]
    );
}

#[test]
fn added_event_carries_the_persisted_entity() {
    let (store, receiver) = observed_store();

    let added = store.categories().add(&Category::new("Work")).unwrap();

    match drain(&receiver).as_slice() {
        [StoreEvent::Category(event)] => {
            assert_eq!(event.action, ObjectAction::Added);
            assert_eq!(event.first_object(), Some(&added));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn failed_mutation_emits_nothing() {
    let (store, receiver) = observed_store();

    store
        .items()
        .add(&Item::new(CategoryId(1), "nowhere", 1))
        .unwrap_err();

    assert!(drain(&receiver).is_empty());
}

#[test]
fn refresh_publishes_get_response() {
    let (store, receiver) = observed_store();
    store.categories().add(&Category::new("Work")).unwrap();
    drain(&receiver);

    let listed = store.categories().refresh().unwrap();

    assert_eq!(
        drain(&receiver),
        vec![StoreEvent::Category(CategoryEvent::new(
            ObjectAction::GetResponse,
            listed
        ))]
    );
}

#[test]
fn dispatch_performs_requests_and_returns_completion() {
    let (store, receiver) = observed_store();

    let done = store
        .dispatch(StoreEvent::Category(CategoryEvent::new(
            ObjectAction::Add,
            vec![Category::new("Work"), Category::new("Home")],
        )))
        .unwrap();

    let StoreEvent::Category(done) = done else {
        panic!("expected a category event");
    };
    assert_eq!(done.action, ObjectAction::Added);
    assert_eq!(done.objects.len(), 2);
    assert!(done.objects.iter().all(|category| category.id.is_some()));
    assert_eq!(drain(&receiver), vec![StoreEvent::Category(done.clone())]);

    let work_id = done.objects[0].id.unwrap();
    let item_done = store
        .dispatch(StoreEvent::Item(ItemEvent::single(
            ObjectAction::Add,
            Item::new(work_id, "Kickoff", 5),
        )))
        .unwrap();
    assert_eq!(item_done.action(), ObjectAction::Added);

    let removed = store
        .dispatch(StoreEvent::Category(CategoryEvent::single(
            ObjectAction::Remove,
            done.objects[0].clone(),
        )))
        .unwrap();
    assert_eq!(removed.action(), ObjectAction::Removed);
    assert_eq!(store.categories().list().unwrap().len(), 1);
}

#[test]
fn dispatch_rejects_completion_actions() {
    let (store, receiver) = observed_store();

    let err = store
        .dispatch(StoreEvent::Item(ItemEvent::new(ObjectAction::Added, vec![])))
        .err()
        .unwrap();

    assert!(matches!(err, StoreError::UnsupportedAction(ObjectAction::Added)));
    assert!(drain(&receiver).is_empty());
}

#[test]
fn import_announces_new_categories_and_all_items_once() {
    let (store, receiver) = observed_store();
    let mut incoming = Category::new("Birthdays");
    incoming.id = Some(CategoryId(8));

    store
        .transfer()
        .import(
            &[incoming],
            &[
                Item::new(CategoryId(8), "Anna", 1),
                Item::new(CategoryId(8), "Ben", 2),
            ],
        )
        .unwrap();

    let events = drain(&receiver);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind(), "category");
    assert_eq!(events[1].kind(), "item");
    assert_eq!(events[1].len(), 2);
}

#[test]
fn closure_observers_run_in_registration_order() {
    let mut store = CelebratoricaStore::open_in_memory().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["ui", "widget"] {
        let log = Arc::clone(&log);
        store.subscribe(move |event: &StoreEvent| {
            log.lock().unwrap().push(format!("{name}:{}", event.action().as_str()));
        });
    }

    store.categories().add(&Category::new("Work")).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["ui:added".to_string(), "widget:added".to_string()]
    );
}
