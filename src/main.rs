mod telemetry;

use aviso_api::Application;
use aviso_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("aviso".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("To apply database migrations");

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
