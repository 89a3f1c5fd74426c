//! Mints a token and submits one calendar coefficient.

use anyhow::Context;
use calendar_service::auth::{AUTHORIZATION_KEY, AuthGate};
use calendar_service::proto::calendar_service_client::CalendarServiceClient;
use calendar_service::proto::{Timestamp, UploadCalendarRequest};
use chrono::Utc;
use clap::Parser;
use std::time::Duration;
use tonic::metadata::MetadataValue;
use types::date::CalendarDate;

#[derive(Parser)]
#[command(name = "calendar-client", about = "Submit a coefficient to the calendar service")]
struct Args {
    #[arg(long, env = "CALENDAR_ENDPOINT", default_value = "http://127.0.0.1:50051")]
    endpoint: String,

    #[arg(long, env = "CALENDAR_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    #[arg(long, default_value = "test_user")]
    user: String,

    #[arg(long, default_value_t = 3600)]
    token_ttl_secs: u64,

    #[arg(long)]
    warehouse: String,

    #[arg(long)]
    acceptance_type: String,

    /// Calendar day, YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long)]
    date: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    coefficient: f64,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let date = match &args.date {
        Some(s) => CalendarDate::parse(s)?,
        None => CalendarDate::new(Utc::now().date_naive())?,
    };

    let token = AuthGate::new(args.jwt_secret.as_bytes())
        .mint(&args.user, Duration::from_secs(args.token_ttl_secs))?;

    let mut client = CalendarServiceClient::connect(args.endpoint.clone())
        .await
        .with_context(|| format!("failed to connect to {}", args.endpoint))?;

    let mut request = tonic::Request::new(UploadCalendarRequest {
        warehouse_name: args.warehouse,
        acceptance_type: args.acceptance_type,
        date: Some(Timestamp {
            seconds: i64::from(date.midnight_utc_secs()),
            nanos: 0,
        }),
        coefficient: args.coefficient,
    });
    let value: MetadataValue<_> = format!("Bearer {token}").parse()?;
    request.metadata_mut().insert(AUTHORIZATION_KEY, value);

    let response = client.upload_calendar(request).await?;
    println!("Response from server: {}", response.into_inner().message);
    Ok(())
}
