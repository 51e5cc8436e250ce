mod common;

use repair_desk::{
    dto::auth::LoginRequest,
    error::AppError,
    lookup_code::generate_code_with,
    middleware::auth::decode_session,
    models::Role,
    services::{auth_service, order_service},
};

use common::{SECRET, admin, create_order, entry, setup_state, staff};

#[tokio::test]
async fn staff_cannot_delete_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Yara", None, None).await?;

    match order_service::delete_order(&state, &staff(), id).await {
        Err(AppError::AdminRequired { redirect }) => assert_eq!(redirect, format!("/os/{id}")),
        other => panic!("expected refusal, got {other:?}"),
    }

    let detail = order_service::get_order(&state, id).await?.data.expect("detail");
    assert_eq!(detail.history.len(), 1);
    Ok(())
}

#[tokio::test]
async fn only_admins_delete_history_entries() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Zeca", None, None).await?;
    let detail = order_service::append_history(&state, &staff(), id, entry("Typo entry"))
        .await?
        .data
        .expect("detail");
    let entry_id = detail.history[0].id;

    assert!(matches!(
        order_service::delete_history_entry(&state, &staff(), entry_id).await,
        Err(AppError::AdminRequired { .. })
    ));
    assert_eq!(
        order_service::get_order(&state, id).await?.data.expect("detail").history.len(),
        2
    );

    order_service::delete_history_entry(&state, &admin(), entry_id).await?;
    let history = order_service::get_order(&state, id).await?.data.expect("detail").history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "Order created");

    assert!(matches!(
        order_service::delete_history_entry(&state, &admin(), entry_id).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn login_issues_a_session_carrying_the_role() -> anyhow::Result<()> {
    let state = setup_state().await?;
    auth_service::upsert_user(&state, "lucas", "s3nha-forte", Role::Admin).await?;
    auth_service::upsert_user(&state, "tiago", "outra-senha", Role::User).await?;

    let resp = auth_service::login_user(
        &state,
        LoginRequest {
            username: "lucas".into(),
            password: "s3nha-forte".into(),
        },
    )
    .await?;
    let login = resp.data.expect("login");
    assert_eq!(login.user.role, Role::Admin);

    let token = login.token.strip_prefix("Bearer ").expect("bearer prefix");
    let session = decode_session(token, SECRET)?;
    assert_eq!(session.username, "lucas");
    assert!(session.is_admin());

    assert!(matches!(
        decode_session(token, "another-secret"),
        Err(AppError::Unauthorized)
    ));
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> anyhow::Result<()> {
    let state = setup_state().await?;
    auth_service::upsert_user(&state, "tiago", "outra-senha", Role::User).await?;

    for (username, password) in [("tiago", "wrong"), ("nobody", "outra-senha")] {
        let result = auth_service::login_user(
            &state,
            LoginRequest {
                username: username.into(),
                password: password.into(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
    Ok(())
}

#[tokio::test]
async fn upsert_resets_password_and_role() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let first = auth_service::upsert_user(&state, "tiago", "old", Role::User).await?;
    let second = auth_service::upsert_user(&state, "tiago", "new", Role::Admin).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.role, Role::Admin);

    let resp = auth_service::login_user(
        &state,
        LoginRequest {
            username: "tiago".into(),
            password: "new".into(),
        },
    )
    .await?;
    assert!(resp.data.is_some());
    Ok(())
}

#[tokio::test]
async fn exhausted_code_space_is_reported() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (_, taken) = create_order(&state, "Alice", None, None).await?;

    let result = generate_code_with(&state.orm, || taken.clone()).await;
    assert!(matches!(result, Err(AppError::CodeSpaceExhausted)));

    let fresh = generate_code_with(&state.orm, || "FRESH1".to_string()).await?;
    assert_eq!(fresh, "FRESH1");
    Ok(())
}
