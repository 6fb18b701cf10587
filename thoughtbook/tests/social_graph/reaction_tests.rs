use super::support::*;

async fn thought_with_author() -> (SocialGraph<MemoryStore>, Thought) {
    let graph = memory_graph();
    create_user(&graph, "alice").await;
    let thought = post(&graph, "alice", "react to me").await;
    (graph, thought)
}

#[tokio::test]
async fn add_then_delete_reaction_restores_reactions() {
    let (graph, thought) = thought_with_author().await;
    let before = graph
        .add_reaction(&thought.id, new_reaction("bob", "first"))
        .await
        .unwrap()
        .reactions;

    let with_second = graph
        .add_reaction(&thought.id, new_reaction("carol", "second"))
        .await
        .unwrap();
    assert_eq!(with_second.reaction_count(), 2);
    let added = with_second.reactions.last().unwrap().clone();
    assert_eq!(added.reaction_body, "second");
    assert_eq!(added.username, "carol");

    let after = graph.delete_reaction(&thought.id, &added.reaction_id).await.unwrap();
    assert_eq!(after.reactions, before);
}

#[tokio::test]
async fn deleting_absent_reaction_is_a_no_op() {
    let (graph, thought) = thought_with_author().await;
    let with_reaction = graph
        .add_reaction(&thought.id, new_reaction("bob", "nice"))
        .await
        .unwrap();

    let unchanged = graph.delete_reaction(&thought.id, "no-such-reaction").await.unwrap();
    assert_eq!(unchanged, with_reaction);
}

#[tokio::test]
async fn reactions_require_an_existing_thought() {
    let graph = memory_graph();
    let err = graph.add_reaction("missing", new_reaction("bob", "hi")).await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "thought", .. }));

    let err = graph.delete_reaction("missing", "r1").await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "thought", .. }));
}

#[tokio::test]
async fn invalid_reaction_is_rejected_before_writing() {
    let (graph, thought) = thought_with_author().await;
    let err = graph.add_reaction(&thought.id, new_reaction("bob", "")).await.unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));

    let err = graph
        .add_reaction(&thought.id, new_reaction("bob", &"y".repeat(281)))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
    assert!(graph.get_thought(&thought.id).await.unwrap().reactions.is_empty());
}

#[tokio::test]
async fn reactions_are_deleted_with_their_thought() {
    let (graph, thought) = thought_with_author().await;
    graph.add_reaction(&thought.id, new_reaction("bob", "bye")).await.unwrap();
    graph.delete_thought(&thought.id).await.unwrap();
    assert!(all_thoughts(&graph).await.is_empty());
}
