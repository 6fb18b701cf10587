use super::support::*;

#[tokio::test]
async fn create_thought_links_author_exactly_once() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;

    let thought = post(&graph, "alice", "hi").await;
    assert_eq!(thought.username, "alice");
    assert_eq!(thought.thought_text, "hi");
    assert!(thought.reactions.is_empty());

    let stored = stored_user(&graph, &alice.id).await.unwrap();
    assert_eq!(stored.thoughts.iter().filter(|id| **id == thought.id).count(), 1);

    let populated = graph.get_user(&alice.id).await.unwrap();
    assert_eq!(populated.thoughts, [thought]);
}

#[tokio::test]
async fn create_thought_for_missing_author_leaves_nothing() {
    let graph = memory_graph();
    let err = graph.create_thought(new_thought("ghost", "hello?")).await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "user", ref key } if key == "ghost"));
    assert!(all_thoughts(&graph).await.is_empty());
}

#[tokio::test]
async fn create_thought_validates_text() {
    let graph = memory_graph();
    create_user(&graph, "alice").await;

    let err = graph.create_thought(new_thought("alice", "")).await.unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));

    let err = graph
        .create_thought(new_thought("alice", &"x".repeat(281)))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
    assert!(all_thoughts(&graph).await.is_empty());
}

#[tokio::test]
async fn list_thoughts_is_empty_then_newest_first() {
    let graph = memory_graph();
    assert!(graph.list_thoughts().await.unwrap().is_empty());

    create_user(&graph, "alice").await;
    for text in ["one", "two", "three"] {
        post(&graph, "alice", text).await;
    }
    let texts: Vec<_> = graph
        .list_thoughts()
        .await
        .unwrap()
        .into_iter()
        .map(|thought| thought.thought_text)
        .collect();
    assert_eq!(texts, ["three", "two", "one"]);
}

#[tokio::test]
async fn author_thoughts_keep_posting_order() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let first = post(&graph, "alice", "first").await;
    let second = post(&graph, "alice", "second").await;

    let populated = graph.get_user(&alice.id).await.unwrap();
    let ids: Vec<_> = populated.thoughts.iter().map(|thought| thought.id.clone()).collect();
    assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn get_and_update_thought() {
    let graph = memory_graph();
    create_user(&graph, "alice").await;
    let thought = post(&graph, "alice", "draft").await;

    let updated = graph
        .update_thought(
            &thought.id,
            ThoughtPatch {
                thought_text: Some("final".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.thought_text, "final");
    assert_eq!(updated.created_at, thought.created_at);
    assert_eq!(graph.get_thought(&thought.id).await.unwrap(), updated);

    let err = graph
        .update_thought(
            "missing",
            ThoughtPatch {
                thought_text: Some("x".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "thought", .. }));

    let err = graph.update_thought(&thought.id, ThoughtPatch::default()).await.unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[tokio::test]
async fn delete_thought_unlinks_author() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let keep = post(&graph, "alice", "keep").await;
    let drop = post(&graph, "alice", "drop").await;

    let deleted = graph.delete_thought(&drop.id).await.unwrap();
    assert_eq!(deleted.id, drop.id);

    let stored = stored_user(&graph, &alice.id).await.unwrap();
    assert_eq!(stored.thoughts, [keep.id]);
    assert!(matches!(
        graph.get_thought(&drop.id).await.unwrap_err(),
        GraphError::NotFound { .. }
    ));
}

#[tokio::test]
async fn delete_missing_thought_is_not_found() {
    let graph = memory_graph();
    let err = graph.delete_thought("missing").await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "thought", .. }));
}

#[tokio::test]
async fn delete_thought_whose_author_is_gone_succeeds() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let thought = post(&graph, "alice", "orphan soon").await;
    Repo::<User>::new().delete_by_id(graph.store(), &alice.id).await.unwrap();

    let deleted = graph.delete_thought(&thought.id).await.unwrap();
    assert_eq!(deleted.id, thought.id);
    assert!(all_thoughts(&graph).await.is_empty());
}

#[tokio::test]
async fn delete_thought_unlinks_even_after_author_rename() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    let thought = post(&graph, "alice", "before rename").await;
    graph
        .update_user(
            &alice.id,
            UserPatch {
                username: Some("alicia".into()),
                email: None,
            },
        )
        .await
        .unwrap();

    // The thought keeps the username it was posted under.
    assert_eq!(graph.get_thought(&thought.id).await.unwrap().username, "alice");

    graph.delete_thought(&thought.id).await.unwrap();
    assert!(stored_user(&graph, &alice.id).await.unwrap().thoughts.is_empty());
}
