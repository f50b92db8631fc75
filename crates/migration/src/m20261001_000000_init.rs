//! Initial schema migration.
//!
//! Creates the complete schema for moim:
//!
//! - `users`: authentication, profile, PIN and personal bank account
//! - `groups`: shared budgets with a date range and a pooled balance
//! - `participants`: named group slots, optionally linked to a user
//! - `wallets`: per-group, per-user deposit totals
//! - `deposits`: deposit ledger (with idempotency keys)
//! - `expenses`: group spending
//! - `notices`: group announcements
//! - `notifications`: per-user fan-out of group events

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Nickname,
    Email,
    PasswordHash,
    PasswordSalt,
    PinHash,
    BankName,
    AccountNumber,
    AccountBalance,
    CreatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    CreatorId,
    CreatedAt,
    StartDate,
    EndDate,
    DueDate,
    TotalBudget,
    Balance,
    ParticipantCount,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    GroupId,
    Nickname,
    UserId,
    IsOwner,
}

#[derive(Iden)]
enum Wallets {
    Table,
    GroupId,
    UserId,
    Balance,
    Paid,
    UpdatedAt,
}

#[derive(Iden)]
enum Deposits {
    Table,
    Id,
    GroupId,
    UserId,
    Amount,
    IdempotencyKey,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    GroupId,
    Date,
    Amount,
    Category,
    Memo,
    Author,
    CreatedAt,
}

#[derive(Iden)]
enum Notices {
    Table,
    Id,
    GroupId,
    Title,
    Content,
    Author,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Kind,
    GroupId,
    GroupName,
    Message,
    Read,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Nickname).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::PasswordSalt).string().not_null())
                    .col(ColumnDef::new(Users::PinHash).string())
                    .col(ColumnDef::new(Users::BankName).string())
                    .col(ColumnDef::new(Users::AccountNumber).string())
                    .col(ColumnDef::new(Users::AccountBalance).big_integer())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Groups
        // ───────────────────────────────────────────────────────────────────
        // `creator_id` is not FK-backed: a withdrawn owner leaves the group
        // behind.
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::Description).string().not_null())
                    .col(ColumnDef::new(Groups::CreatorId).string().not_null())
                    .col(ColumnDef::new(Groups::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Groups::StartDate).date().not_null())
                    .col(ColumnDef::new(Groups::EndDate).date().not_null())
                    .col(ColumnDef::new(Groups::DueDate).date().not_null())
                    .col(ColumnDef::new(Groups::TotalBudget).big_integer().not_null())
                    .col(
                        ColumnDef::new(Groups::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Groups::ParticipantCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-groups-creator_id")
                    .table(Groups::Table)
                    .col(Groups::CreatorId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::GroupId).string().not_null())
                    .col(ColumnDef::new(Participants::Nickname).string().not_null())
                    .col(ColumnDef::new(Participants::UserId).string())
                    .col(
                        ColumnDef::new(Participants::IsOwner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participants-group_id")
                            .from(Participants::Table, Participants::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-group_id-nickname-unique")
                    .table(Participants::Table)
                    .col(Participants::GroupId)
                    .col(Participants::Nickname)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // NULL user ids (unclaimed slots) do not collide in a unique index.
        manager
            .create_index(
                Index::create()
                    .name("idx-participants-group_id-user_id-unique")
                    .table(Participants::Table)
                    .col(Participants::GroupId)
                    .col(Participants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::GroupId).string().not_null())
                    .col(ColumnDef::new(Wallets::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wallets::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Wallets::UpdatedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .col(Wallets::GroupId)
                            .col(Wallets::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallets-group_id")
                            .from(Wallets::Table, Wallets::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallets-user_id")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Deposits
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Deposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deposits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deposits::GroupId).string().not_null())
                    .col(ColumnDef::new(Deposits::UserId).string().not_null())
                    .col(ColumnDef::new(Deposits::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Deposits::IdempotencyKey).string())
                    .col(ColumnDef::new(Deposits::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposits-group_id")
                            .from(Deposits::Table, Deposits::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposits-idempotency_key")
                    .table(Deposits::Table)
                    .col(Deposits::GroupId)
                    .col(Deposits::UserId)
                    .col(Deposits::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::GroupId).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Memo).string())
                    .col(ColumnDef::new(Expenses::Author).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-group_id")
                            .from(Expenses::Table, Expenses::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-group_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::GroupId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Notices
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notices::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notices::GroupId).string().not_null())
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Content).string().not_null())
                    .col(ColumnDef::new(Notices::Author).string().not_null())
                    .col(ColumnDef::new(Notices::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notices-group_id")
                            .from(Notices::Table, Notices::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Notifications
        // ───────────────────────────────────────────────────────────────────
        // `group_id` is not FK-backed: notifications outlive deleted groups.
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::GroupId).string().not_null())
                    .col(ColumnDef::new(Notifications::GroupName).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-user_id-created_at")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deposits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
