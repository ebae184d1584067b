// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        auth_handlers, bus_handlers, bus_stop_handlers, faculty_handlers, mw_auth, notification_handlers,
        student_trip_handlers, trip_bus_stop_handlers, trip_handlers, user_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    let faculty_routes = Router::new()
        .route("/", get(faculty_handlers::handle_list_faculties).post(faculty_handlers::handle_create_faculty))
        .route(
            "/{id}",
            get(faculty_handlers::handle_get_faculty)
                .put(faculty_handlers::handle_update_faculty)
                .delete(faculty_handlers::handle_delete_faculty),
        );

    let bus_routes = Router::new()
        .route("/", get(bus_handlers::handle_list_buses).post(bus_handlers::handle_create_bus))
        .route(
            "/{id}",
            get(bus_handlers::handle_get_bus)
                .put(bus_handlers::handle_update_bus)
                .delete(bus_handlers::handle_delete_bus),
        );

    // Rotas estáticas convivem com /{id}; o axum dá prioridade às estáticas
    let bus_stop_routes = Router::new()
        .route("/", get(bus_stop_handlers::handle_list_bus_stops).post(bus_stop_handlers::handle_create_bus_stop))
        .route("/ida", get(bus_stop_handlers::handle_ida_stops))
        .route("/volta/{trip_id}", get(bus_stop_handlers::handle_volta_stops))
        .route("/list/faculty_names", get(bus_stop_handlers::handle_faculty_names))
        .route(
            "/{id}",
            get(bus_stop_handlers::handle_get_bus_stop)
                .put(bus_stop_handlers::handle_update_bus_stop)
                .delete(bus_stop_handlers::handle_delete_bus_stop),
        );

    let user_routes = Router::new()
        .route("/", get(user_handlers::handle_list_users).post(user_handlers::handle_create_user))
        .route(
            "/{id}",
            get(user_handlers::handle_get_user)
                .put(user_handlers::handle_update_user)
                .delete(user_handlers::handle_delete_user),
        )
        .route("/{id}/profile_picture", put(user_handlers::handle_update_profile_picture));

    let trip_routes = Router::new()
        .route("/", get(trip_handlers::handle_list_trips).post(trip_handlers::handle_create_trip))
        .route(
            "/{id}",
            get(trip_handlers::handle_get_trip)
                .put(trip_handlers::handle_update_trip)
                .delete(trip_handlers::handle_delete_trip),
        )
        .route("/{id}/finalizar_ida", put(trip_handlers::handle_finalizar_ida))
        .route("/{id}/finalizar_volta", put(trip_handlers::handle_finalizar_volta));

    let student_trip_routes = Router::new()
        .route(
            "/",
            get(student_trip_handlers::handle_list_student_trips).post(student_trip_handlers::handle_create_student_trip),
        )
        .route(
            "/{id}",
            get(student_trip_handlers::handle_get_student_trip).delete(student_trip_handlers::handle_delete_student_trip),
        )
        .route("/{id}/update_point", put(student_trip_handlers::handle_update_point))
        .route("/{id}/update_trip", put(student_trip_handlers::handle_update_trip))
        .route("/{id}/status", put(student_trip_handlers::handle_update_status));

    let trip_bus_stop_routes = Router::new()
        .route(
            "/",
            get(trip_bus_stop_handlers::handle_list_trip_bus_stops)
                .post(trip_bus_stop_handlers::handle_create_trip_bus_stop),
        )
        .route(
            "/{id}",
            get(trip_bus_stop_handlers::handle_get_trip_bus_stop)
                .put(trip_bus_stop_handlers::handle_update_trip_bus_stop)
                .delete(trip_bus_stop_handlers::handle_delete_trip_bus_stop),
        );

    // /auth/me exige sessão; o resto do /auth é público
    let session_routes = Router::new()
        .route("/me", get(auth_handlers::handle_me))
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    let auth_routes = Router::new()
        .route("/", post(auth_handlers::handle_login))
        .route("/logout", post(auth_handlers::handle_logout))
        .route("/forgot-password", post(auth_handlers::handle_forgot_password))
        .route("/reset-password", post(auth_handlers::handle_reset_password))
        .merge(session_routes);

    let notification_routes =
        Router::new().route("/send-notification", post(notification_handlers::handle_send_notification));

    Router::new()
        .nest("/faculties", faculty_routes)
        .nest("/buses", bus_routes)
        .nest("/bus_stops", bus_stop_routes)
        .nest("/users", user_routes)
        .nest("/trips", trip_routes)
        .nest("/student_trips", student_trip_routes)
        .nest("/trip_bus_stops", trip_bus_stop_routes)
        .nest("/auth", auth_routes)
        .nest("/notifications", notification_routes)
        .with_state(app_state)
}
