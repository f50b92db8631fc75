//! Usernames of withdrawn accounts.
//!
//! Groups, expenses and notices keep referring to a withdrawn username, so
//! the name stays reserved and can never be registered again.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum WithdrawnUsers {
    Table,
    Username,
    WithdrawnAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WithdrawnUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WithdrawnUsers::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WithdrawnUsers::WithdrawnAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WithdrawnUsers::Table).to_owned())
            .await?;

        Ok(())
    }
}
