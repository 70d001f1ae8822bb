//! Fleet database handle.

use std::collections::HashSet;

use sea_orm::{
    ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr, EntityName, EntityTrait,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait, SchemaManager};
use tracing::info;

use common::DatabaseConfig;

use super::migrations::Migrator;

/// A known schema migration and whether it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Pooled connection to the fleet database.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;
        db.migrate_up().await?;
        info!("Fleet database ready");
        Ok(db)
    }

    /// Open the pool and leave the schema alone.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(false);

        Ok(Self {
            connection: SeaDatabase::connect(options).await?,
        })
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn migrate_up(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Revert the most recent migration.
    pub async fn migrate_down(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Drop every fleet table and migrate from scratch.
    pub async fn reset(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// All migrations in order, with their applied flag. A database that was
    /// never migrated reports every migration as pending.
    pub async fn migrations(&self) -> Result<Vec<MigrationState>, DbErr> {
        let applied: HashSet<String> = if self.has_migration_table().await? {
            seaql_migrations::Entity::find()
                .all(&self.connection)
                .await?
                .into_iter()
                .map(|row| row.version)
                .collect()
        } else {
            HashSet::new()
        };

        Ok(Migrator::migrations()
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                MigrationState {
                    applied: applied.contains(&name),
                    name,
                }
            })
            .collect())
    }

    async fn has_migration_table(&self) -> Result<bool, DbErr> {
        SchemaManager::new(&self.connection)
            .has_table(seaql_migrations::Entity.table_name())
            .await
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
