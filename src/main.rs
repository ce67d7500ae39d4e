//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, tenant_guard};
use crate::services::document_service::MAX_FILE_SIZE;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é adequado aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/login/tenant/{tenant_id}",
            post(handlers::auth::login_with_tenant),
        )
        .route(
            "/switch-tenant/{tenant_id}",
            post(handlers::auth::switch_tenant).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Conta do próprio usuário (qualquer sessão válida, com ou sem condomínio)
    let account_routes = Router::new()
        .route(
            "/",
            get(handlers::account::get_account).patch(handlers::account::update_account),
        )
        .route("/password", patch(handlers::account::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Condomínios do usuário (auto-criação e listagem)
    let tenant_routes = Router::new()
        .route(
            "/",
            post(handlers::tenancy::create_tenant).get(handlers::tenancy::my_tenants),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Administração da plataforma; o extrator GlobalAdmin faz o gate de papel
    let admin_routes = Router::new()
        .route(
            "/tenants",
            post(handlers::tenancy::admin_create_tenant)
                .get(handlers::tenancy::admin_list_tenants),
        )
        .route(
            "/tenants/{id}",
            get(handlers::tenancy::admin_get_tenant)
                .put(handlers::tenancy::admin_update_tenant)
                .delete(handlers::tenancy::admin_delete_tenant),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Membros do condomínio ativo
    let user_routes = Router::new()
        .route("/", get(handlers::users::list_members))
        .route(
            "/{id}",
            get(handlers::users::get_member).delete(handlers::users::remove_member),
        )
        .route("/{id}/membership", patch(handlers::users::update_membership))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let unit_routes = Router::new()
        .route(
            "/",
            post(handlers::units::create_unit).get(handlers::units::list_units),
        )
        .route(
            "/{id}",
            get(handlers::units::get_unit)
                .put(handlers::units::update_unit)
                .delete(handlers::units::delete_unit),
        )
        .route("/number/{number}", get(handlers::units::get_unit_by_number))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let folder_routes = Router::new()
        .route(
            "/",
            post(handlers::folders::create_folder).get(handlers::folders::list_folders),
        )
        .route(
            "/{id}",
            get(handlers::folders::get_folder)
                .put(handlers::folders::update_folder)
                .delete(handlers::folders::delete_folder),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let document_routes = Router::new()
        .route(
            "/upload",
            post(handlers::documents::upload_document)
                // Upload de arquivos até 10 MB, com folga para o overhead do multipart
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/", get(handlers::documents::list_documents))
        .route(
            "/{id}",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .route("/{id}/download", get(handlers::documents::download_document))
        .route("/{id}/move", patch(handlers::documents::move_document))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // Convites misturam rotas públicas (consulta e aceite por token) com
    // rotas protegidas; aqui a proteção vem dos extratores de cada handler.
    let invite_routes = Router::new()
        .route(
            "/",
            post(handlers::invites::create_invite).get(handlers::invites::tenant_invites),
        )
        .route("/me", get(handlers::invites::my_invites))
        .route(
            "/{id}",
            get(handlers::invites::get_invite).delete(handlers::invites::cancel_invite),
        )
        .route("/{id}/accept", post(handlers::invites::accept_invite));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/account", account_routes)
        .nest("/api/tenants", tenant_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/users", user_routes)
        .nest("/api/units", unit_routes)
        .nest("/api/folders", folder_routes)
        .nest("/api/documents", document_routes)
        .nest("/api/invites", invite_routes)
        .with_state(app_state.clone());

    let addr = format!("0.0.0.0:{}", app_state.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().expect("endereço local indisponível")
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Erro no servidor Axum");
}

// Encerra limpo em Ctrl+C ou SIGTERM (containers)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Falha ao instalar o handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Falha ao instalar o handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Sinal de desligamento recebido; encerrando...");
}
