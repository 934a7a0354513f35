//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Fournil:
//!
//! - `users`: authentication
//! - `ingredients`: stocked raw purchases, never deleted
//! - `product_lots`: manufactured batches with their date-scoped lot codes
//! - `lot_ingredients`: ingredient→lot provenance links
//! - `sales`: one sale per lot, enforced by a unique index
//! - `lot_code_counters`: per-date sequence rows for code allocation

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
    Password,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
    Name,
    Brand,
    Supplier,
    SupplierLot,
    Notes,
    MrpMinor,
    ExpiresOn,
    IsExhausted,
    RecordedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ProductLots {
    Table,
    Id,
    LotCode,
    ProductName,
    ManufacturedOn,
    ExpiresOn,
    RecordedBy,
    CreatedAt,
}

#[derive(Iden)]
enum LotIngredients {
    Table,
    ProductLotId,
    IngredientId,
    QuantityUsed,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    ProductLotId,
    Customer,
    SellingPriceMinor,
    SoldOn,
    RecordedBy,
    CreatedAt,
}

#[derive(Iden)]
enum LotCodeCounters {
    Table,
    ManufacturedOn,
    NextSeq,
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
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ingredients::Name).string().not_null())
                    .col(ColumnDef::new(Ingredients::Brand).string())
                    .col(ColumnDef::new(Ingredients::Supplier).string())
                    .col(ColumnDef::new(Ingredients::SupplierLot).string().not_null())
                    .col(ColumnDef::new(Ingredients::Notes).string())
                    .col(
                        ColumnDef::new(Ingredients::MrpMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Ingredients::ExpiresOn).date().not_null())
                    .col(
                        ColumnDef::new(Ingredients::IsExhausted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Ingredients::RecordedBy).string().not_null())
                    .col(
                        ColumnDef::new(Ingredients::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ingredients-recorded_by")
                            .from(Ingredients::Table, Ingredients::RecordedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ingredients-name")
                    .table(Ingredients::Table)
                    .col(Ingredients::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ingredients-expires_on")
                    .table(Ingredients::Table)
                    .col(Ingredients::ExpiresOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Product lots
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ProductLots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductLots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductLots::LotCode).string().not_null())
                    .col(ColumnDef::new(ProductLots::ProductName).string().not_null())
                    .col(
                        ColumnDef::new(ProductLots::ManufacturedOn)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductLots::ExpiresOn).date().not_null())
                    .col(ColumnDef::new(ProductLots::RecordedBy).string().not_null())
                    .col(
                        ColumnDef::new(ProductLots::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_lots-recorded_by")
                            .from(ProductLots::Table, ProductLots::RecordedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-product_lots-lot_code-unique")
                    .table(ProductLots::Table)
                    .col(ProductLots::LotCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-product_lots-manufactured_on")
                    .table(ProductLots::Table)
                    .col(ProductLots::ManufacturedOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Lot ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LotIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotIngredients::ProductLotId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotIngredients::IngredientId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LotIngredients::QuantityUsed).big_integer())
                    .primary_key(
                        Index::create()
                            .col(LotIngredients::ProductLotId)
                            .col(LotIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lot_ingredients-product_lot_id")
                            .from(LotIngredients::Table, LotIngredients::ProductLotId)
                            .to(ProductLots::Table, ProductLots::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lot_ingredients-ingredient_id")
                            .from(LotIngredients::Table, LotIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-lot_ingredients-ingredient_id")
                    .table(LotIngredients::Table)
                    .col(LotIngredients::IngredientId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::ProductLotId).string().not_null())
                    .col(ColumnDef::new(Sales::Customer).string().not_null())
                    .col(
                        ColumnDef::new(Sales::SellingPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sales::SoldOn).date().not_null())
                    .col(ColumnDef::new(Sales::RecordedBy).string().not_null())
                    .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-product_lot_id")
                            .from(Sales::Table, Sales::ProductLotId)
                            .to(ProductLots::Table, ProductLots::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-recorded_by")
                            .from(Sales::Table, Sales::RecordedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // One sale per lot: the constraint that settles concurrent sellers.
        manager
            .create_index(
                Index::create()
                    .name("idx-sales-product_lot_id-unique")
                    .table(Sales::Table)
                    .col(Sales::ProductLotId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-sold_on")
                    .table(Sales::Table)
                    .col(Sales::SoldOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Lot code counters
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LotCodeCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotCodeCounters::ManufacturedOn)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotCodeCounters::NextSeq)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(LotCodeCounters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LotIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductLots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
