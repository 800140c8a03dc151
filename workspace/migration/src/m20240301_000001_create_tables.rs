use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name))
                    .col(string_len(Accounts::Kind, 10))
                    .col(string_len(Accounts::CurrencyCode, 3))
                    .col(decimal_len(Accounts::Balance, 16, 4))
                    .col(string_null(Accounts::Description))
                    .col(timestamp(Accounts::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Accounts::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::AccountId))
                    .col(string_len(Transactions::Kind, 10))
                    .col(decimal_len(Transactions::Amount, 16, 4))
                    .col(string_len(Transactions::CurrencyCode, 3))
                    .col(string(Transactions::Category))
                    .col(string(Transactions::Description))
                    .col(date(Transactions::TransactionDate))
                    .col(timestamp(Transactions::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create planned_items table
        manager
            .create_table(
                Table::create()
                    .table(PlannedItems::Table)
                    .if_not_exists()
                    .col(pk_auto(PlannedItems::Id))
                    .col(integer(PlannedItems::AccountId))
                    .col(string_len(PlannedItems::Kind, 10))
                    .col(decimal_len(PlannedItems::Amount, 16, 4))
                    .col(string_len(PlannedItems::CurrencyCode, 3))
                    .col(string(PlannedItems::Category))
                    .col(string(PlannedItems::Description))
                    .col(date(PlannedItems::PlannedDate))
                    .col(boolean(PlannedItems::IsRecurring).default(false))
                    .col(string_null(PlannedItems::RecurrencePeriod))
                    .col(timestamp(PlannedItems::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_planned_item_account")
                            .from(PlannedItems::Table, PlannedItems::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create regular_incomes table
        manager
            .create_table(
                Table::create()
                    .table(RegularIncomes::Table)
                    .if_not_exists()
                    .col(pk_auto(RegularIncomes::Id))
                    .col(integer(RegularIncomes::AccountId))
                    .col(string(RegularIncomes::Name))
                    .col(string_len(RegularIncomes::Category, 15))
                    .col(decimal_len(RegularIncomes::Amount, 16, 4))
                    .col(string_len(RegularIncomes::CurrencyCode, 3))
                    .col(integer(RegularIncomes::ExpectedDay))
                    .col(string(RegularIncomes::Description))
                    .col(boolean(RegularIncomes::IsActive).default(true))
                    .col(timestamp(RegularIncomes::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_regular_income_account")
                            .from(RegularIncomes::Table, RegularIncomes::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create regular_expenses table
        manager
            .create_table(
                Table::create()
                    .table(RegularExpenses::Table)
                    .if_not_exists()
                    .col(pk_auto(RegularExpenses::Id))
                    .col(integer(RegularExpenses::AccountId))
                    .col(string(RegularExpenses::Name))
                    .col(string_len(RegularExpenses::Category, 15))
                    .col(decimal_len(RegularExpenses::Amount, 16, 4))
                    .col(string_len(RegularExpenses::CurrencyCode, 3))
                    .col(integer(RegularExpenses::ExpectedDay))
                    .col(string(RegularExpenses::Description))
                    .col(boolean(RegularExpenses::IsActive).default(true))
                    .col(timestamp(RegularExpenses::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_regular_expense_account")
                            .from(RegularExpenses::Table, RegularExpenses::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create income_payments table
        manager
            .create_table(
                Table::create()
                    .table(IncomePayments::Table)
                    .if_not_exists()
                    .col(pk_auto(IncomePayments::Id))
                    .col(integer(IncomePayments::RegularIncomeId))
                    .col(date(IncomePayments::ExpectedDate))
                    .col(date(IncomePayments::ActualDate))
                    .col(decimal_len(IncomePayments::Amount, 16, 4))
                    .col(string_len(IncomePayments::CurrencyCode, 3))
                    .col(integer(IncomePayments::DelayDays))
                    .col(string(IncomePayments::Notes))
                    .col(timestamp(IncomePayments::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_income_payment_income")
                            .from(IncomePayments::Table, IncomePayments::RegularIncomeId)
                            .to(RegularIncomes::Table, RegularIncomes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create expense_payments table
        manager
            .create_table(
                Table::create()
                    .table(ExpensePayments::Table)
                    .if_not_exists()
                    .col(pk_auto(ExpensePayments::Id))
                    .col(integer(ExpensePayments::RegularExpenseId))
                    .col(date(ExpensePayments::ExpectedDate))
                    .col(date(ExpensePayments::ActualDate))
                    .col(decimal_len(ExpensePayments::Amount, 16, 4))
                    .col(string_len(ExpensePayments::CurrencyCode, 3))
                    .col(integer(ExpensePayments::DelayDays))
                    .col(string(ExpensePayments::Notes))
                    .col(timestamp(ExpensePayments::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_payment_expense")
                            .from(ExpensePayments::Table, ExpensePayments::RegularExpenseId)
                            .to(RegularExpenses::Table, RegularExpenses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExpensePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegularExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegularIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlannedItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Kind,
    CurrencyCode,
    Balance,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    Kind,
    Amount,
    CurrencyCode,
    Category,
    Description,
    TransactionDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlannedItems {
    Table,
    Id,
    AccountId,
    Kind,
    Amount,
    CurrencyCode,
    Category,
    Description,
    PlannedDate,
    IsRecurring,
    RecurrencePeriod,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RegularIncomes {
    Table,
    Id,
    AccountId,
    Name,
    Category,
    Amount,
    CurrencyCode,
    ExpectedDay,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RegularExpenses {
    Table,
    Id,
    AccountId,
    Name,
    Category,
    Amount,
    CurrencyCode,
    ExpectedDay,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IncomePayments {
    Table,
    Id,
    RegularIncomeId,
    ExpectedDate,
    ActualDate,
    Amount,
    CurrencyCode,
    DelayDays,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExpensePayments {
    Table,
    Id,
    RegularExpenseId,
    ExpectedDate,
    ActualDate,
    Amount,
    CurrencyCode,
    DelayDays,
    Notes,
    CreatedAt,
}
