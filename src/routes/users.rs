use actix_web::{get, post, web, Responder};
use validator::Validate;

use crate::data::payloads::{Login, Register, Token, UserClaims, UserInfo};
use crate::errors::{Error, Result};
use crate::queries::{self, Database};
use crate::utilities;

#[post("/register")]
pub async fn register(
    pool: web::Data<Database>,
    form: web::Json<Register>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;

    if queries::fetch_user_by_username(&pool, form.username.clone())
        .await?
        .is_some()
    {
        return Err(Error::UsernameTaken);
    }

    // hash the password before it touches the database
    let password = utilities::password::hash(form.password.clone())?;
    let record = queries::create_user(&pool, form.username.clone(), password).await?;

    // issue a token so the new user is logged in immediately
    let claims = UserClaims {
        id: record.id,
        username: record.username,
    };
    Ok(web::Json(Token::bearer(&claims)?))
}

#[post("/login")]
pub async fn login(pool: web::Data<Database>, form: web::Form<Login>) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;

    // fetch the database record by username
    let record = queries::fetch_user_by_username(&pool, form.username.clone())
        .await?
        .ok_or(Error::InvalidCredentials)?;

    // validate the password hash
    utilities::password::valid(record.password.clone(), form.password.clone())
        .map_err(|_| Error::InvalidCredentials)?;

    let claims = UserClaims {
        id: record.id,
        username: record.username,
    };
    Ok(web::Json(Token::bearer(&claims)?))
}

#[get("/me")]
pub async fn me(pool: web::Data<Database>, user: UserClaims) -> Result<impl Responder> {
    let record = queries::fetch_user(&pool, user.id)
        .await?
        .ok_or(Error::Unauthorized)?;

    Ok(web::Json(UserInfo::from(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;

    #[actix_web::test]
    async fn test_endpoint_register() {
        let database = "test_routes_register";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_json(Register {
                    username: "TEST".into(),
                    password: "PASSWORD".into(),
                })
                .to_request(),
        )
        .await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let token: Token = serde_json::from_slice(&body).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(token.access_token.len() > 50);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_register_duplicate() {
        let database = "test_routes_register_duplicate";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let _ = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/register")
                .set_json(Register {
                    username: "TEST".into(),
                    password: "PASSWORD".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_login() {
        let database = "test_routes_login";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let _ = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(Login {
                    username: "TEST".into(),
                    password: "PASSWORD".into(),
                })
                .to_request(),
        )
        .await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let token: Token = serde_json::from_slice(&body).unwrap();
        assert!(token.access_token.len() > 50);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_login_wrong_password() {
        let database = "test_routes_login_wrong_password";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let _ = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(Login {
                    username: "TEST".into(),
                    password: "WRONGWORD".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_login_unknown_user() {
        let database = "test_routes_login_unknown_user";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(Login {
                    username: "BADNAME".into(),
                    password: "PASSWORD".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_me() {
        let database = "test_routes_me";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let token = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
                .to_request(),
        )
        .await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let info: UserInfo = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.username, "TEST");

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_endpoint_me_without_token() {
        let database = "test_routes_me_without_token";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        test_utils::teardown(database);
    }
}
