//! Migration: Create manufacturers, drivers, cars and the car/driver join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Manufacturers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Manufacturers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Manufacturers::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Manufacturers::Country).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drivers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Drivers::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Drivers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Drivers::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Drivers::LastName).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Drivers::LicenseNumber)
                            .string_len(8)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Drivers::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cars::Model).string_len(255).not_null())
                    .col(ColumnDef::new(Cars::ManufacturerId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_manufacturer")
                            .from(Cars::Table, Cars::ManufacturerId)
                            .to(Manufacturers::Table, Manufacturers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CarsDrivers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CarsDrivers::CarId).uuid().not_null())
                    .col(ColumnDef::new(CarsDrivers::DriverId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_cars_drivers")
                            .col(CarsDrivers::CarId)
                            .col(CarsDrivers::DriverId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_drivers_car")
                            .from(CarsDrivers::Table, CarsDrivers::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_drivers_driver")
                            .from(CarsDrivers::Table, CarsDrivers::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Driver-side lookups ("cars of this driver")
        manager
            .create_index(
                Index::create()
                    .name("idx_cars_drivers_driver_id")
                    .table(CarsDrivers::Table)
                    .col(CarsDrivers::DriverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_manufacturer_id")
                    .table(Cars::Table)
                    .col(Cars::ManufacturerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CarsDrivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Manufacturers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Manufacturers {
    Table,
    Id,
    Name,
    Country,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Username,
    PasswordHash,
    FirstName,
    LastName,
    LicenseNumber,
    DateJoined,
}

#[derive(Iden)]
enum Cars {
    Table,
    Id,
    Model,
    ManufacturerId,
}

#[derive(Iden)]
enum CarsDrivers {
    Table,
    CarId,
    DriverId,
}
