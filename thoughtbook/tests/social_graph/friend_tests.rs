use super::support::*;

#[tokio::test]
async fn add_friend_twice_conflicts_and_keeps_one_entry() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;

    let updated = graph.add_friend(&alice.id, &bob.id).await.unwrap();
    assert_eq!(updated.user.friends, [bob.id.clone()]);
    assert_eq!(updated.friends.len(), 1);
    assert_eq!(updated.friends[0].username, "bob");

    let err = graph.add_friend(&alice.id, &bob.id).await.unwrap_err();
    assert!(matches!(err, GraphError::Conflict { .. }));

    let stored = stored_user(&graph, &alice.id).await.unwrap();
    assert_eq!(stored.friends.iter().filter(|id| **id == bob.id).count(), 1);
}

#[tokio::test]
async fn friendship_is_directed() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;

    graph.add_friend(&alice.id, &bob.id).await.unwrap();

    let bob = stored_user(&graph, &bob.id).await.unwrap();
    assert!(bob.friends.is_empty());
    assert!(stored_user(&graph, &alice.id).await.unwrap().is_friend(&bob.id));
}

#[tokio::test]
async fn add_friend_requires_both_users() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;

    let err = graph.add_friend(&alice.id, "ghost").await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { ref key, .. } if key == "ghost"));

    let err = graph.add_friend("ghost", &alice.id).await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { ref key, .. } if key == "ghost"));
    assert!(stored_user(&graph, &alice.id).await.unwrap().friends.is_empty());
}

#[tokio::test]
async fn befriending_yourself_is_invalid() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let err = graph.add_friend(&alice.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[tokio::test]
async fn delete_friend_removes_edge() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;
    let carol = create_user(&graph, "carol").await;
    graph.add_friend(&alice.id, &bob.id).await.unwrap();
    graph.add_friend(&alice.id, &carol.id).await.unwrap();

    let updated = graph.delete_friend(&alice.id, &bob.id).await.unwrap();
    assert_eq!(updated.user.friends, [carol.id.clone()]);
    assert_eq!(updated.user.friend_count(), 1);

    // Removing someone who is not a friend leaves the list alone.
    let unchanged = graph.delete_friend(&alice.id, &bob.id).await.unwrap();
    assert_eq!(unchanged.user.friends, [carol.id]);
}

#[tokio::test]
async fn delete_friend_requires_user() {
    let graph = memory_graph();
    let bob = create_user(&graph, "bob").await;
    let err = graph.delete_friend("ghost", &bob.id).await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn deleted_friend_drops_out_of_populated_view() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;
    graph.add_friend(&alice.id, &bob.id).await.unwrap();

    // Remove bob without the cascade so alice keeps a dangling reference.
    Repo::<User>::new().delete_by_id(graph.store(), &bob.id).await.unwrap();

    let populated = graph.get_user(&alice.id).await.unwrap();
    assert!(populated.friends.is_empty());
    assert_eq!(populated.user.friends, [bob.id]);
}
