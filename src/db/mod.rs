//! Database Connection Management Module
//!
//! MongoDB 연결을 생성하고 `ServiceLocator`에 등록할 핸들을 제공합니다.
//! 리포지토리는 `#[repository]` 매크로가 생성한 `collection()` 헬퍼를 통해
//! `get_database()`를 사용합니다.
//!
//! ```bash
//! export DATABASE="mongodb+srv://natours:<PASSWORD>@cluster0.mongodb.net"
//! export DATABASE_PASSWORD="secret"
//! export DATABASE_NAME="natours"
//! ```

use log::info;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};

use crate::config::DatabaseConfig;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 연결 문자열을 파싱하고 `ping`으로 연결을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let connection_string = DatabaseConfig::connection_string();
        let database_name = DatabaseConfig::database_name();

        let mut client_options = ClientOptions::parse(&connection_string).await?;
        client_options.app_name = Some("tour_booking_backend".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
