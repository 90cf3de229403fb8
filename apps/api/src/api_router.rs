use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use rolegate_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let principal_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/auth/password", post(auth::change_password_handler))
        .route(
            "/api/access/check",
            post(handlers::access::check_access_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route("/api/roles/root", get(handlers::roles::root_role_handler))
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .patch(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/parent",
            put(handlers::roles::reparent_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions/copy",
            post(handlers::roles::copy_permissions_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions/inherited",
            delete(handlers::roles::remove_inherited_permissions_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions/resync",
            post(handlers::roles::resync_inherited_permissions_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler)
                .post(handlers::permissions::add_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(handlers::permissions::get_permission_handler)
                .delete(handlers::permissions::remove_permission_handler),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users_handler)
                .post(handlers::users::register_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(handlers::users::get_user_handler).delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            get(handlers::users::list_user_roles_handler),
        )
        .route(
            "/api/users/{user_id}/roles/{role_id}",
            put(handlers::users::assign_role_handler)
                .delete(handlers::users::unassign_role_handler),
        )
        .route_layer(from_fn(middleware::attach_principal));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(principal_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
