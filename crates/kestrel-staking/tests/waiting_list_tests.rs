//! Pointer-surgery tests for the waiting list over the in-memory store.

use kestrel_staking::{storage, WaitingList};
use kestrel_vm::InMemoryVmContext;

fn new_context() -> InMemoryVmContext {
    InMemoryVmContext::new(b"stakingSc".to_vec())
}

fn keys_in_order(ctx: &InMemoryVmContext) -> Vec<Vec<u8>> {
    WaitingList::load(ctx)
        .expect("head decodes")
        .walk(ctx)
        .expect("consistent chain")
}

fn assert_chain_consistent(ctx: &InMemoryVmContext) {
    let list = WaitingList::load(ctx).expect("head decodes");
    let mut cursor = list.head().first_key.clone();
    let mut previous: Vec<u8> = Vec::new();
    let mut visited = 0u32;

    while !cursor.is_empty() {
        let element = storage::waiting_element(ctx, &cursor)
            .expect("element decodes")
            .expect("element exists");
        assert_eq!(element.previous_key, previous, "previous pointer broken");
        previous = cursor.clone();
        cursor = element.next_key.clone();
        visited += 1;
    }

    assert_eq!(list.head().last_key, previous, "last pointer broken");
    assert_eq!(list.len(), visited, "recorded length drifted");
}

#[test]
fn push_back_keeps_arrival_order() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");

    list.push_back(&mut ctx, b"alpha").expect("push alpha");
    list.push_back(&mut ctx, b"beta").expect("push beta");
    list.push_back(&mut ctx, b"gamma").expect("push gamma");

    assert_eq!(
        keys_in_order(&ctx),
        vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]
    );
    assert_chain_consistent(&ctx);

    let reloaded = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.head().first_key, b"w_alpha".to_vec());
    assert_eq!(reloaded.head().last_key, b"w_gamma".to_vec());
}

#[test]
fn duplicate_push_is_refused() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");

    list.push_back(&mut ctx, b"alpha").expect("push alpha");
    assert!(list.push_back(&mut ctx, b"alpha").is_err());
    assert_eq!(WaitingList::load(&ctx).expect("head decodes").len(), 1);
}

#[test]
fn remove_splices_head_middle_and_tail() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    for key in [b"one".as_slice(), b"two", b"three", b"four"] {
        list.push_back(&mut ctx, key).expect("push");
    }

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.remove(&mut ctx, b"two").expect("remove middle");
    assert_eq!(
        keys_in_order(&ctx),
        vec![b"one".to_vec(), b"three".to_vec(), b"four".to_vec()]
    );
    assert_chain_consistent(&ctx);

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.remove(&mut ctx, b"one").expect("remove head");
    assert_eq!(keys_in_order(&ctx), vec![b"three".to_vec(), b"four".to_vec()]);
    assert_chain_consistent(&ctx);

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.remove(&mut ctx, b"four").expect("remove tail");
    assert_eq!(keys_in_order(&ctx), vec![b"three".to_vec()]);
    assert_chain_consistent(&ctx);

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.remove(&mut ctx, b"three").expect("remove last");
    assert!(keys_in_order(&ctx).is_empty());
    let empty = WaitingList::load(&ctx).expect("head decodes");
    assert!(empty.head().first_key.is_empty());
    assert!(empty.head().last_key.is_empty());

    // The element records are gone from storage as well.
    assert!(storage::waiting_element(&ctx, b"w_two")
        .expect("decodes")
        .is_none());
}

#[test]
fn remove_of_an_absent_key_fails() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    assert!(list.remove(&mut ctx, b"ghost").is_err());
}

#[test]
fn pop_front_drains_in_order() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    for key in [b"one".as_slice(), b"two"] {
        list.push_back(&mut ctx, key).expect("push");
    }

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.pop_front(&mut ctx).expect("pop"), Some(b"one".to_vec()));
    assert_chain_consistent(&ctx);

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.pop_front(&mut ctx).expect("pop"), Some(b"two".to_vec()));
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.pop_front(&mut ctx).expect("pop"), None);
}

#[test]
fn jailed_keys_form_a_prefix_block() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.push_back(&mut ctx, b"fresh1").expect("push");
    list.push_back(&mut ctx, b"fresh2").expect("push");

    // First re-queued jailed key becomes the new head.
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed1")
        .expect("insert first jailed");
    assert_eq!(
        keys_in_order(&ctx),
        vec![b"jailed1".to_vec(), b"fresh1".to_vec(), b"fresh2".to_vec()]
    );

    // The next one lands right behind it.
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed2")
        .expect("insert second jailed");
    assert_eq!(
        keys_in_order(&ctx),
        vec![
            b"jailed1".to_vec(),
            b"jailed2".to_vec(),
            b"fresh1".to_vec(),
            b"fresh2".to_vec()
        ]
    );
    assert_chain_consistent(&ctx);

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.head().last_jailed_key, b"w_jailed2".to_vec());

    assert_eq!(list.position(&ctx, b"jailed1").expect("walk"), Some(1));
    assert_eq!(list.position(&ctx, b"fresh2").expect("walk"), Some(4));
    assert_eq!(list.position(&ctx, b"ghost").expect("walk"), None);
}

#[test]
fn jailed_insert_into_an_empty_list() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed1")
        .expect("insert into empty");

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.len(), 1);
    assert_eq!(list.head().first_key, b"w_jailed1".to_vec());
    assert_eq!(list.head().last_key, b"w_jailed1".to_vec());
    assert_eq!(list.head().last_jailed_key, b"w_jailed1".to_vec());
    assert_chain_consistent(&ctx);
}

#[test]
fn jailed_insert_behind_the_tail_extends_the_list() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed1")
        .expect("insert");

    // The anchor is the tail, so the new element becomes the tail.
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed2")
        .expect("insert behind tail");

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(list.head().last_key, b"w_jailed2".to_vec());
    assert_eq!(
        keys_in_order(&ctx),
        vec![b"jailed1".to_vec(), b"jailed2".to_vec()]
    );
    assert_chain_consistent(&ctx);
}

#[test]
fn removing_the_last_jailed_key_clears_the_pointer() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.push_back(&mut ctx, b"fresh1").expect("push");
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed1")
        .expect("insert");

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.remove(&mut ctx, b"jailed1").expect("remove");

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert!(list.head().last_jailed_key.is_empty());
    assert_eq!(keys_in_order(&ctx), vec![b"fresh1".to_vec()]);
}

#[test]
fn popping_the_last_jailed_key_clears_the_pointer() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.insert_after_last_jailed(&mut ctx, b"jailed1")
        .expect("insert");

    let mut list = WaitingList::load(&ctx).expect("head decodes");
    assert_eq!(
        list.pop_front(&mut ctx).expect("pop"),
        Some(b"jailed1".to_vec())
    );

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert!(list.head().last_jailed_key.is_empty());
    assert_eq!(list.len(), 0);
}

#[test]
fn walk_detects_a_corrupted_length() {
    let mut ctx = new_context();
    let mut list = WaitingList::load(&ctx).expect("head decodes");
    list.push_back(&mut ctx, b"alpha").expect("push");

    // Corrupt the recorded length behind the list's back.
    let mut head = storage::waiting_list_head(&ctx).expect("head decodes");
    head.length = 2;
    storage::save_waiting_list_head(&mut ctx, &head);

    let list = WaitingList::load(&ctx).expect("head decodes");
    assert!(list.walk(&ctx).is_err());
}
