//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Email).string_len(320).not_null())
                    .col(ColumnDef::new(User::Password).string_len(256).not_null())
                    .col(ColumnDef::new(User::Token).string_len(64).not_null())
                    .col(ColumnDef::new(User::Name).string_len(128).not_null())
                    .col(ColumnDef::new(User::Avatar).string_len(1024))
                    .col(ColumnDef::new(User::Bio).text())
                    .col(
                        ColumnDef::new(User::Role)
                            .string_len(16)
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(User::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(User::PendingName).string_len(128))
                    .col(ColumnDef::new(User::PendingAvatar).string_len(1024))
                    .col(
                        ColumnDef::new(User::ReviewStatus)
                            .string_len(16)
                            .not_null()
                            .default("none"),
                    )
                    .col(ColumnDef::new(User::ReviewNotes).text())
                    .col(ColumnDef::new(User::ReviewSubmittedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: token
        manager
            .create_index(
                Index::create()
                    .name("idx_user_token")
                    .table(User::Table)
                    .col(User::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: review_status (pending review queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_review_status")
                    .table(User::Table)
                    .col(User::ReviewStatus)
                    .col(User::ReviewSubmittedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (role, status) for the site author lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role_status")
                    .table(User::Table)
                    .col(User::Role)
                    .col(User::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    Password,
    Token,
    Name,
    Avatar,
    Bio,
    Role,
    Status,
    PendingName,
    PendingAvatar,
    ReviewStatus,
    ReviewNotes,
    ReviewSubmittedAt,
    CreatedAt,
    UpdatedAt,
}
