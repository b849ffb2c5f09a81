//! CRM tables: the two identity collections plus prospects and the rows
//! hanging off them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Salespersons {
    Table,
    Id,
    AuthUid,
    Email,
    DisplayName,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    AuthUid,
    Email,
    DisplayName,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Prospects {
    Table,
    Id,
    FullName,
    Email,
    Status,
    AssignedToId,
    SalespersonId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    ProspectId,
    Kind,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reminders {
    Table,
    Id,
    ProspectId,
    Title,
    Status,
    DueAt,
    CreatedAt,
}

fn index(
    name: &str,
    table: impl IntoIden + 'static,
    column: impl IntoIden + 'static,
) -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(column)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Salespersons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salespersons::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Salespersons::AuthUid).string())
                    .col(ColumnDef::new(Salespersons::Email).string())
                    .col(ColumnDef::new(Salespersons::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Salespersons::Role)
                            .string()
                            .not_null()
                            .default("salesperson"),
                    )
                    .col(
                        ColumnDef::new(Salespersons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::AuthUid).string())
                    .col(ColumnDef::new(Users::Email).string())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("salesperson"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prospects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prospects::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Prospects::FullName).string().not_null())
                    .col(ColumnDef::new(Prospects::Email).string())
                    .col(ColumnDef::new(Prospects::Status).string())
                    .col(ColumnDef::new(Prospects::AssignedToId).string())
                    .col(ColumnDef::new(Prospects::SalespersonId).string())
                    .col(
                        ColumnDef::new(Prospects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Activities::ProspectId).string().not_null())
                    .col(ColumnDef::new(Activities::Kind).string())
                    .col(ColumnDef::new(Activities::Notes).text())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reminders::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Reminders::ProspectId).string().not_null())
                    .col(ColumnDef::new(Reminders::Title).string().not_null())
                    .col(ColumnDef::new(Reminders::Status).string())
                    .col(ColumnDef::new(Reminders::DueAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Reminders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for stmt in [
            index("idx_salespersons_auth_uid", Salespersons::Table, Salespersons::AuthUid),
            index("idx_users_auth_uid", Users::Table, Users::AuthUid),
            index("idx_prospects_assigned_to_id", Prospects::Table, Prospects::AssignedToId),
            index("idx_prospects_salesperson_id", Prospects::Table, Prospects::SalespersonId),
            index("idx_activities_prospect_id", Activities::Table, Activities::ProspectId),
            index("idx_reminders_prospect_id", Reminders::Table, Reminders::ProspectId),
        ] {
            manager.create_index(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Reminders::Table.into_iden(),
            Activities::Table.into_iden(),
            Prospects::Table.into_iden(),
            Users::Table.into_iden(),
            Salespersons::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
