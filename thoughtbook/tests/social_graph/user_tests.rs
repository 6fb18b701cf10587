use super::support::*;

#[tokio::test]
async fn create_user_trims_and_starts_empty() {
    let graph = memory_graph();
    let created = graph
        .create_user(NewUser {
            username: "  alice  ".into(),
            email: " alice@example.com ".into(),
        })
        .await
        .expect("create user");

    assert_eq!(created.user.username, "alice");
    assert_eq!(created.user.email, "alice@example.com");
    assert!(created.thoughts.is_empty());
    assert!(created.friends.is_empty());
    assert_eq!(created.user.friend_count(), 0);
}

#[tokio::test]
async fn duplicate_username_or_email_is_rejected_without_partial_record() {
    let graph = memory_graph();
    create_user(&graph, "alice").await;

    let err = graph
        .create_user(NewUser {
            username: "alice".into(),
            email: "other@example.com".into(),
        })
        .await
        .unwrap_err();
    match err {
        GraphError::Validation(validation) => {
            assert_eq!(validation.issues[0].field, "username");
            assert_eq!(validation.issues[0].code, "validation.unique");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let err = graph
        .create_user(NewUser {
            username: "alice2".into(),
            email: "alice@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));

    let users = graph.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(graph.store().len(Collection::Users).unwrap(), 1);
}

#[tokio::test]
async fn invalid_fields_are_reported_together() {
    let graph = memory_graph();
    let err = graph
        .create_user(NewUser {
            username: "   ".into(),
            email: "nope".into(),
        })
        .await
        .unwrap_err();
    let GraphError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    let fields: Vec<_> = validation.issues.iter().map(|issue| issue.field.as_str()).collect();
    assert_eq!(fields, ["username", "email"]);
    assert!(graph.store().is_empty(Collection::Users).unwrap());
}

#[tokio::test]
async fn list_users_is_newest_first() {
    let graph = memory_graph();
    for name in ["first", "second", "third"] {
        create_user(&graph, name).await;
    }
    let names: Vec<_> = graph
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|populated| populated.user.username)
        .collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let graph = memory_graph();
    let err = graph.get_user("missing").await.unwrap_err();
    assert!(matches!(err, GraphError::NotFound { entity: "user", ref key } if key == "missing"));
}

#[tokio::test]
async fn update_user_replaces_named_fields() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;

    let updated = graph
        .update_user(
            &alice.id,
            UserPatch {
                username: None,
                email: Some("new@example.com".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.user.email, "new@example.com");
    assert_eq!(updated.user.username, "alice");
    assert_eq!(updated.user.created_at, alice.created_at);
}

#[tokio::test]
async fn update_user_rejects_taken_values_and_keeps_original() {
    let graph = memory_graph();
    create_user(&graph, "alice").await;
    let bob = create_user(&graph, "bob").await;

    let err = graph
        .update_user(
            &bob.id,
            UserPatch {
                username: Some("alice".into()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
    assert_eq!(stored_user(&graph, &bob.id).await.unwrap().username, "bob");

    let err = graph
        .update_user(
            &bob.id,
            UserPatch {
                username: None,
                email: Some("not an email".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[tokio::test]
async fn update_user_requires_existing_user_and_a_field() {
    let graph = memory_graph();
    let err = graph
        .update_user(
            "missing",
            UserPatch {
                username: Some("ghost".into()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NotFound { .. }));

    let alice = create_user(&graph, "alice").await;
    let err = graph.update_user(&alice.id, UserPatch::default()).await.unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[tokio::test]
async fn usernames_become_free_after_delete() {
    let graph = memory_graph();
    let alice = create_user(&graph, "alice").await;
    graph.delete_user(&alice.id).await.unwrap();
    let again = create_user(&graph, "alice").await;
    assert_ne!(again.id, alice.id);
}
