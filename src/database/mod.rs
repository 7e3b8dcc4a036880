use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuned for a single-instance deployment
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .unwrap_or("tapzx_db");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the unique indexes the stores rely on. The indexes are the
    /// authoritative enforcement of email/phone/username uniqueness; the
    /// pre-checks in the services only exist for friendly error messages.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;

        log::info!("🔧 Creating database indexes...");

        let unique = |keys| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        let users = self.db.collection::<mongodb::bson::Document>("users");
        for (name, index) in [
            ("users(email)", unique(doc! { "email": 1 })),
            ("users(phone_number)", unique(doc! { "phone_number": 1 })),
        ] {
            match users.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}", name),
                Err(e) => log::warn!("   ⚠️  Index {}: {}", name, e),
            }
        }

        let profiles = self.db.collection::<mongodb::bson::Document>("profiles");
        for (name, index) in [
            ("profiles(username)", unique(doc! { "username": 1 })),
            ("profiles(user_id)", unique(doc! { "user_id": 1 })),
        ] {
            match profiles.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}", name),
                Err(e) => log::warn!("   ⚠️  Index {}: {}", name, e),
            }
        }

        let links = self.db.collection::<mongodb::bson::Document>("links");
        match links.create_index(unique(doc! { "user_id": 1 })).await {
            Ok(_) => log::info!("   ✅ Index created: links(user_id)"),
            Err(e) => log::warn!("   ⚠️  Index links(user_id): {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
