//! `SeaORM` entity definitions for the `sales` schema.

pub mod account_contracts;
pub mod account_lists;
pub mod account_products;
pub mod accounts;
pub mod addresses;
pub mod emails;
pub mod entities;
pub mod entity_accounts;
pub mod individuals;
pub mod invoice_items;
pub mod invoices;
pub mod non_individuals;
pub mod numbers;
pub mod order_items;
pub mod orders;
pub mod product_list_items;
pub mod product_lists;
pub mod products;
pub mod sys_users;
pub mod websites;
