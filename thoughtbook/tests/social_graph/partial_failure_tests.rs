use super::support::*;

fn failing_graph() -> SocialGraph<FailingStore> {
    SocialGraph::new(FailingStore::new())
}

#[tokio::test]
async fn failed_insert_leaves_no_user() {
    let graph = failing_graph();
    graph.store().fail_next(Op::Insert, Collection::Users);

    let err = graph.create_user(new_user("alice")).await.unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));
    assert!(graph.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_author_link_leaves_unreferenced_thought() {
    let graph = failing_graph();
    let alice = create_user(&graph, "alice").await;
    graph.store().fail_next(Op::FindOneAndUpdate, Collection::Users);

    let err = graph.create_thought(new_thought("alice", "lost link")).await.unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));

    // The thought was stored and is not rolled back; the author never got the id.
    let thoughts = all_thoughts(&graph).await;
    assert_eq!(thoughts.len(), 1);
    assert_eq!(thoughts[0].username, "alice");
    let populated = graph.get_user(&alice.id).await.unwrap();
    assert!(populated.user.thoughts.is_empty());
    assert!(populated.thoughts.is_empty());
}

#[tokio::test]
async fn failed_unlink_leaves_dangling_reference_that_reads_tolerate() {
    let graph = failing_graph();
    let alice = create_user(&graph, "alice").await;
    let thought = post(&graph, "alice", "going away").await;
    graph.store().fail_next(Op::UpdateMany, Collection::Users);

    let err = graph.delete_thought(&thought.id).await.unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));

    assert!(all_thoughts(&graph).await.is_empty());
    let populated = graph.get_user(&alice.id).await.unwrap();
    assert_eq!(populated.user.thoughts, [thought.id]);
    assert!(populated.thoughts.is_empty());
}

#[tokio::test]
async fn failed_cascade_stops_before_friend_cleanup() {
    let graph = failing_graph();
    let alice = create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;
    post(&graph, "alice", "survivor").await;
    graph.add_friend(&bob.id, &alice.id).await.unwrap();
    graph.store().fail_next(Op::DeleteMany, Collection::Thoughts);

    let err = graph.delete_user(&alice.id).await.unwrap_err();
    assert!(matches!(err, GraphError::Store(_)));

    assert!(stored_user(&graph, &alice.id).await.is_none());
    assert_eq!(all_thoughts(&graph).await.len(), 1);
    // No later step ran, so bob still references alice; the view drops her.
    let bob = graph.get_user(&bob.id).await.unwrap();
    assert_eq!(bob.user.friends, [alice.id]);
    assert!(bob.friends.is_empty());
}

#[tokio::test]
async fn failed_user_delete_runs_no_cascade() {
    let graph = failing_graph();
    let alice = create_user(&graph, "alice").await;
    post(&graph, "alice", "safe").await;
    graph.store().fail_next(Op::FindOneAndDelete, Collection::Users);

    assert!(graph.delete_user(&alice.id).await.is_err());
    assert!(stored_user(&graph, &alice.id).await.is_some());
    assert_eq!(all_thoughts(&graph).await.len(), 1);
}
