//! Resource catalogue used to key error codes and messages.

use serde::Serialize;

/// Every record type exposed by the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Customer account.
    Account,
    /// Account to product link.
    AccountProduct,
    /// Account to product list link.
    AccountList,
    /// Contract attached to an account.
    AccountContract,
    /// Postal address of an entity or account.
    Address,
    /// Polymorphic parent of individuals and non-individuals.
    Entity,
    /// Person owned by an entity.
    Individual,
    /// Organization owned by an entity.
    NonIndividual,
    /// E-mail address of an entity.
    Email,
    /// Phone number of an entity.
    Number,
    /// Website of an entity.
    Website,
    /// Entity to account link.
    EntityAccount,
    /// Sales order.
    Order,
    /// Line item of a sales order.
    OrderItem,
    /// Invoice for a sales order.
    Invoice,
    /// Line item of an invoice.
    InvoiceItem,
    /// Catalog product.
    Product,
    /// Named price list.
    ProductList,
    /// Product priced within a product list.
    ProductListItem,
    /// Operator account.
    SysUser,
}

impl Resource {
    /// Error code raised when a live row is expected but absent.
    #[must_use]
    pub const fn not_exist_code(self) -> &'static str {
        match self {
            Self::Account => "account_not_exist",
            Self::AccountProduct => "account_product_not_exist",
            Self::AccountList => "account_list_not_exist",
            Self::AccountContract => "account_contract_not_exist",
            Self::Address => "address_not_exist",
            Self::Entity => "entity_not_exist",
            Self::Individual => "individual_not_exist",
            Self::NonIndividual => "non_individual_not_exist",
            Self::Email => "email_not_exist",
            Self::Number => "number_not_exist",
            Self::Website => "website_not_exist",
            Self::EntityAccount => "entity_account_not_exist",
            Self::Order => "order_not_exist",
            Self::OrderItem => "order_item_not_exist",
            Self::Invoice => "invoice_not_exist",
            Self::InvoiceItem => "invoice_item_not_exist",
            Self::Product => "product_not_exist",
            Self::ProductList => "product_list_not_exist",
            Self::ProductListItem => "product_list_item_not_exist",
            Self::SysUser => "sys_user_not_exist",
        }
    }

    /// Error code raised when a create or update would duplicate a live row.
    #[must_use]
    pub const fn exists_code(self) -> &'static str {
        match self {
            Self::Account => "account_exists",
            Self::AccountProduct => "account_product_exists",
            Self::AccountList => "account_list_exists",
            Self::AccountContract => "account_contract_exists",
            Self::Address => "address_exists",
            Self::Entity => "entity_exists",
            Self::Individual => "individual_exists",
            Self::NonIndividual => "non_individual_exists",
            Self::Email => "email_exists",
            Self::Number => "number_exists",
            Self::Website => "website_exists",
            Self::EntityAccount => "entity_account_exists",
            Self::Order => "order_exists",
            Self::OrderItem => "order_item_exists",
            Self::Invoice => "invoice_exists",
            Self::InvoiceItem => "invoice_item_exists",
            Self::Product => "product_exists",
            Self::ProductList => "product_list_exists",
            Self::ProductListItem => "product_list_item_exists",
            Self::SysUser => "sys_user_credential_combination_not_allowed",
        }
    }

    /// Human readable label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::AccountProduct => "Account product",
            Self::AccountList => "Account list",
            Self::AccountContract => "Account contract",
            Self::Address => "Address",
            Self::Entity => "Entity",
            Self::Individual => "Individual",
            Self::NonIndividual => "Non-individual",
            Self::Email => "Email",
            Self::Number => "Number",
            Self::Website => "Website",
            Self::EntityAccount => "Entity account",
            Self::Order => "Order",
            Self::OrderItem => "Order item",
            Self::Invoice => "Invoice",
            Self::InvoiceItem => "Invoice item",
            Self::Product => "Product",
            Self::ProductList => "Product list",
            Self::ProductListItem => "Product list item",
            Self::SysUser => "System user",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
