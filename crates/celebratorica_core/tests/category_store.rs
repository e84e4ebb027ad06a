use celebratorica_core::{
    Category, CategoryId, CelebratoricaStore, Item, ModelError, RepoError,
};

fn store_with(names: &[&str]) -> CelebratoricaStore {
    let store = CelebratoricaStore::open_in_memory().unwrap();
    for name in names {
        store.categories().add(&Category::new(*name)).unwrap();
    }
    store
}

fn orders(store: &CelebratoricaStore) -> Vec<(String, i64)> {
    store
        .categories()
        .list()
        .unwrap()
        .into_iter()
        .map(|category| (category.name, category.order))
        .collect()
}

fn by_name(store: &CelebratoricaStore, name: &str) -> Category {
    store.categories().find_by_name(name).unwrap().unwrap()
}

fn owned(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
    pairs
        .iter()
        .map(|(name, order)| (name.to_string(), *order))
        .collect()
}

#[test]
fn add_without_order_appends_after_max() {
    let store = CelebratoricaStore::open_in_memory().unwrap();

    let first = store.categories().add(&Category::new("Work")).unwrap();
    assert_eq!(first.order, 1);
    assert!(first.id.is_some());

    let second = store.categories().add(&Category::new("Home")).unwrap();
    assert_eq!(second.order, 2);
    assert_ne!(first.id, second.id);
}

#[test]
fn add_with_order_shifts_following_categories() {
    let store = store_with(&["Work", "Home"]);

    let friends = store
        .categories()
        .add(&Category::at_order("Friends", 2))
        .unwrap();

    assert_eq!(friends.order, 2);
    assert_eq!(
        orders(&store),
        owned(&[("Work", 1), ("Friends", 2), ("Home", 3)])
    );
}

#[test]
fn add_at_first_position_shifts_everything() {
    let store = store_with(&["Work", "Home"]);

    store.categories().add(&Category::at_order("Top", 1)).unwrap();

    assert_eq!(orders(&store), owned(&[("Top", 1), ("Work", 2), ("Home", 3)]));
}

#[test]
fn add_past_the_end_keeps_orders_dense() {
    let store = store_with(&["Work"]);

    let far = store.categories().add(&Category::at_order("Far", 9)).unwrap();

    assert_eq!(far.order, 2);
    assert_eq!(orders(&store), owned(&[("Work", 1), ("Far", 2)]));
}

#[test]
fn remove_closes_the_gap() {
    let store = store_with(&["Work", "Home", "Friends", "Family"]);
    let home = by_name(&store, "Home");

    let removed = store.categories().remove(&home).unwrap();

    assert_eq!(removed.name, "Home");
    assert_eq!(
        orders(&store),
        owned(&[("Work", 1), ("Friends", 2), ("Family", 3)])
    );
}

#[test]
fn remove_uses_stored_order_not_caller_order() {
    let store = store_with(&["Work", "Home", "Friends"]);
    let mut stale = by_name(&store, "Work");
    stale.order = 3;

    store.categories().remove(&stale).unwrap();

    assert_eq!(orders(&store), owned(&[("Home", 1), ("Friends", 2)]));
}

#[test]
fn removed_category_can_be_restored_in_place() {
    let store = store_with(&["Work", "Home", "Friends"]);
    let removed = store
        .categories()
        .remove(&by_name(&store, "Home"))
        .unwrap();

    let restored = store
        .categories()
        .add(&Category::at_order(removed.name.clone(), removed.order))
        .unwrap();

    assert_eq!(restored.order, 2);
    assert_eq!(
        orders(&store),
        owned(&[("Work", 1), ("Home", 2), ("Friends", 3)])
    );
}

#[test]
fn remove_does_not_cascade_to_items() {
    let store = store_with(&["Work"]);
    let work = by_name(&store, "Work");
    let work_id = work.id.unwrap();
    store
        .items()
        .add(&Item::new(work_id, "Ship release", 1_000))
        .unwrap();

    store.categories().remove(&work).unwrap();

    assert!(store.categories().list().unwrap().is_empty());
    assert_eq!(store.items().count(work_id).unwrap(), 1);
    assert_eq!(store.items().list(None).unwrap().len(), 1);
}

#[test]
fn remove_unknown_or_unsaved_category_fails() {
    let store = store_with(&["Work"]);

    let mut ghost = Category::at_order("Ghost", 1);
    let unsaved_err = store.categories().remove(&ghost).unwrap_err();
    assert!(matches!(
        unsaved_err,
        RepoError::Validation(ModelError::MissingId("category"))
    ));

    ghost.id = Some(CategoryId(999));
    let missing_err = store.categories().remove(&ghost).unwrap_err();
    assert!(matches!(missing_err, RepoError::CategoryNotFound(CategoryId(999))));
    assert_eq!(orders(&store), owned(&[("Work", 1)]));
}

#[test]
fn update_overwrites_name_and_order() {
    let store = store_with(&["Work"]);
    let mut work = by_name(&store, "Work");
    work.name = "  Office   parties ".to_string();

    let updated = store.categories().update(&work).unwrap();

    assert_eq!(updated.name, "Office parties");
    assert_eq!(store.categories().get(work.id.unwrap()).unwrap(), Some(updated));
}

#[test]
fn update_rejects_unknown_id_and_invalid_fields() {
    let store = store_with(&["Work"]);

    let mut ghost = Category::at_order("Ghost", 1);
    ghost.id = Some(CategoryId(404));
    assert!(matches!(
        store.categories().update(&ghost).unwrap_err(),
        RepoError::CategoryNotFound(CategoryId(404))
    ));

    let mut work = by_name(&store, "Work");
    work.name = "   ".to_string();
    assert!(matches!(
        store.categories().update(&work).unwrap_err(),
        RepoError::Validation(ModelError::EmptyCategoryName)
    ));
}

#[test]
fn add_rejects_blank_names() {
    let store = CelebratoricaStore::open_in_memory().unwrap();

    let err = store.categories().add(&Category::new(" \t ")).unwrap_err();

    assert!(matches!(err, RepoError::Validation(ModelError::EmptyCategoryName)));
    assert!(store.categories().list().unwrap().is_empty());
}

#[test]
fn find_by_name_ignores_case_and_extra_whitespace() {
    let store = store_with(&["Birthdays"]);

    let found = store.categories().find_by_name("  birthDAYS ").unwrap();

    assert_eq!(found.map(|category| category.name), Some("Birthdays".to_string()));
    assert!(store.categories().find_by_name("Weddings").unwrap().is_none());
}

#[test]
fn reorder_moves_category_and_renumbers_neighbours() {
    let store = store_with(&["A", "B", "C", "D"]);
    let d = by_name(&store, "D");

    store.categories().reorder(d.id.unwrap(), 2).unwrap();
    assert_eq!(
        orders(&store),
        owned(&[("A", 1), ("D", 2), ("B", 3), ("C", 4)])
    );

    let a = by_name(&store, "A");
    let moved = store.categories().reorder(a.id.unwrap(), 99).unwrap();
    assert_eq!(moved.order, 4);
    assert_eq!(
        orders(&store),
        owned(&[("D", 1), ("B", 2), ("C", 3), ("A", 4)])
    );

    let unchanged = store.categories().reorder(a.id.unwrap(), 4).unwrap();
    assert_eq!(unchanged.order, 4);
    assert!(matches!(
        store.categories().reorder(CategoryId(999), 1),
        Err(RepoError::CategoryNotFound(CategoryId(999)))
    ));
}

#[test]
fn batch_add_assigns_consecutive_orders() {
    let store = CelebratoricaStore::open_in_memory().unwrap();

    let added = store
        .categories()
        .add_all(&[Category::new("Work"), Category::new("Home")])
        .unwrap();

    assert_eq!(added.len(), 2);
    assert_eq!(orders(&store), owned(&[("Work", 1), ("Home", 2)]));
}

#[test]
fn failed_reorder_rolls_back_the_whole_mutation() {
    let store = store_with(&["Work", "Home"]);
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER block_reorder
             BEFORE UPDATE OF display_order ON categories
             BEGIN
                 SELECT RAISE(ABORT, 'reorder blocked');
             END;",
        )
        .unwrap();

    let add_err = store
        .categories()
        .add(&Category::at_order("Friends", 1))
        .unwrap_err();
    assert!(matches!(add_err, RepoError::Db(_)));

    let remove_err = store
        .categories()
        .remove(&by_name(&store, "Work"))
        .unwrap_err();
    assert!(matches!(remove_err, RepoError::Db(_)));

    assert_eq!(orders(&store), owned(&[("Work", 1), ("Home", 2)]));
}
