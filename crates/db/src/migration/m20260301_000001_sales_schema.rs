//! Creates the `sales` schema and its twenty tables.
//!
//! Every table has a serial `id`, a generated `uuid` that foreign keys point
//! at, and the six `sys_*` audit columns. Duplicate keys are unique indexes
//! restricted to live rows, so a soft-deleted row never blocks a new one.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(SCHEMA_SQL).await?;

        // ============================================================
        // SYSTEM USERS
        // ============================================================
        db.execute_unprepared(SYS_USERS_SQL).await?;

        // ============================================================
        // PRODUCT CATALOG
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PRODUCT_LISTS_SQL).await?;
        db.execute_unprepared(PRODUCT_LIST_ITEMS_SQL).await?;

        // ============================================================
        // ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNT_PRODUCTS_SQL).await?;
        db.execute_unprepared(ACCOUNT_LISTS_SQL).await?;
        db.execute_unprepared(ACCOUNT_CONTRACTS_SQL).await?;

        // ============================================================
        // ENTITIES AND CONTACTS
        // ============================================================
        db.execute_unprepared(ENTITIES_SQL).await?;
        db.execute_unprepared(ENTITY_CHILDREN_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(ADDRESSES_SQL).await?;
        db.execute_unprepared(ENTITY_ACCOUNTS_SQL).await?;

        // ============================================================
        // ORDERS AND INVOICES
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SCHEMA_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const SCHEMA_SQL: &str = r"
CREATE SCHEMA IF NOT EXISTS sales;
";

const SYS_USERS_SQL: &str = r"
CREATE TABLE sales.sys_users (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    username VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL,
    disabled_at TIMESTAMPTZ,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_sys_users_email ON sales.sys_users(email) WHERE sys_deleted_at IS NULL;
CREATE UNIQUE INDEX uq_sys_users_username ON sales.sys_users(username) WHERE sys_deleted_at IS NULL;
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE sales.pm_products (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(64),
    terms TEXT,
    description TEXT,
    sys_allowed_price_increase BOOLEAN NOT NULL DEFAULT false,
    sys_allowed_price_decrease BOOLEAN NOT NULL DEFAULT false,
    man_allowed_price_increase BOOLEAN NOT NULL DEFAULT false,
    man_allowed_price_decrease BOOLEAN NOT NULL DEFAULT false,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_pm_products_name ON sales.pm_products(name) WHERE sys_deleted_at IS NULL;
CREATE UNIQUE INDEX uq_pm_products_code ON sales.pm_products(code) WHERE sys_deleted_at IS NULL;
";

const PRODUCT_LISTS_SQL: &str = r"
CREATE TABLE sales.pm_product_lists (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    owner_uuid UUID REFERENCES sales.sys_users(uuid),
    name VARCHAR(255) NOT NULL,
    start_on DATE NOT NULL,
    end_on DATE NOT NULL,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_pm_product_lists_window CHECK (end_on >= start_on)
);

CREATE UNIQUE INDEX uq_pm_product_lists_name ON sales.pm_product_lists(name) WHERE sys_deleted_at IS NULL;
";

const PRODUCT_LIST_ITEMS_SQL: &str = r"
CREATE TABLE sales.pm_product_list_items (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    product_list_uuid UUID NOT NULL REFERENCES sales.pm_product_lists(uuid),
    product_uuid UUID NOT NULL REFERENCES sales.pm_products(uuid),
    price NUMERIC(10, 2) NOT NULL,
    sys_allowed_price_increase BOOLEAN NOT NULL DEFAULT false,
    man_allowed_price_increase BOOLEAN NOT NULL DEFAULT false,
    sys_allowed_price_decrease BOOLEAN NOT NULL DEFAULT false,
    man_allowed_price_decrease BOOLEAN NOT NULL DEFAULT false,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_pm_product_list_items_price CHECK (price >= 0)
);

CREATE UNIQUE INDEX uq_pm_product_list_items_product
    ON sales.pm_product_list_items(product_list_uuid, product_uuid)
    WHERE sys_deleted_at IS NULL;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE sales.acc_accounts (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    sys_value_status_uuid UUID,
    name VARCHAR(255) NOT NULL,
    start_on DATE,
    end_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);
";

const ACCOUNT_PRODUCTS_SQL: &str = r"
CREATE TABLE sales.acc_account_products (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    account_uuid UUID NOT NULL REFERENCES sales.acc_accounts(uuid),
    product_uuid UUID NOT NULL REFERENCES sales.pm_products(uuid),
    start_on DATE,
    end_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_acc_account_products_pair
    ON sales.acc_account_products(account_uuid, product_uuid)
    WHERE sys_deleted_at IS NULL;
";

const ACCOUNT_LISTS_SQL: &str = r"
CREATE TABLE sales.acc_account_lists (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    account_uuid UUID NOT NULL REFERENCES sales.acc_accounts(uuid),
    product_list_uuid UUID NOT NULL REFERENCES sales.pm_product_lists(uuid),
    start_on DATE,
    end_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_acc_account_lists_pair
    ON sales.acc_account_lists(account_uuid, product_list_uuid)
    WHERE sys_deleted_at IS NULL;
";

const ACCOUNT_CONTRACTS_SQL: &str = r"
CREATE TABLE sales.acc_account_contracts (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    account_uuid UUID NOT NULL REFERENCES sales.acc_accounts(uuid),
    document_metadata_uuid UUID,
    sys_value_type_uuid UUID,
    start_on DATE,
    end_on DATE,
    notification_days INTEGER,
    status VARCHAR(64),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_acc_account_contracts_notice CHECK (notification_days >= 0)
);
";

const ENTITIES_SQL: &str = r"
CREATE TABLE sales.em_entities (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    type VARCHAR(32) NOT NULL,
    tin VARCHAR(64),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_em_entities_type CHECK (type IN ('individual', 'non-individual'))
);
";

const ENTITY_CHILDREN_SQL: &str = r"
CREATE TABLE sales.em_individuals (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_individuals_entity
    ON sales.em_individuals(entity_uuid)
    WHERE sys_deleted_at IS NULL;

CREATE TABLE sales.em_non_individuals (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_non_individuals_entity
    ON sales.em_non_individuals(entity_uuid)
    WHERE sys_deleted_at IS NULL;
";

const CONTACTS_SQL: &str = r"
CREATE TABLE sales.em_emails (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    email VARCHAR(255) NOT NULL,
    username VARCHAR(255),
    domain VARCHAR(255),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_emails_email
    ON sales.em_emails(entity_uuid, email)
    WHERE sys_deleted_at IS NULL;

CREATE TABLE sales.em_numbers (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    sys_value_type_uuid UUID,
    country_code VARCHAR(3),
    area_code VARCHAR(3) NOT NULL,
    line_number VARCHAR(4) NOT NULL,
    extension VARCHAR(6),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_numbers_number
    ON sales.em_numbers(entity_uuid, country_code, area_code, line_number, extension)
    NULLS NOT DISTINCT
    WHERE sys_deleted_at IS NULL;

CREATE TABLE sales.em_websites (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    sys_value_type_uuid UUID,
    url VARCHAR(2048) NOT NULL,
    description TEXT,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_websites_url
    ON sales.em_websites(entity_uuid, url)
    WHERE sys_deleted_at IS NULL;
";

const ADDRESSES_SQL: &str = r"
CREATE TABLE sales.em_addresses (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    parent_uuid UUID NOT NULL,
    parent_table VARCHAR(32) NOT NULL,
    sys_value_type_uuid UUID,
    address_line1 VARCHAR(255),
    address_line2 VARCHAR(255),
    city VARCHAR(255),
    county VARCHAR(255),
    state VARCHAR(255),
    country VARCHAR(255),
    zip VARCHAR(5),
    zip_plus4 VARCHAR(4),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_em_addresses_parent CHECK (parent_table IN ('entities', 'accounts'))
);

CREATE INDEX idx_em_addresses_parent ON sales.em_addresses(parent_table, parent_uuid);

CREATE UNIQUE INDEX uq_em_addresses_street
    ON sales.em_addresses(parent_uuid, address_line1, address_line2, city)
    NULLS NOT DISTINCT
    WHERE sys_deleted_at IS NULL;
";

const ENTITY_ACCOUNTS_SQL: &str = r"
CREATE TABLE sales.em_entity_accounts (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    entity_uuid UUID NOT NULL REFERENCES sales.em_entities(uuid),
    account_uuid UUID NOT NULL REFERENCES sales.acc_accounts(uuid),
    start_on DATE,
    end_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_em_entity_accounts_pair
    ON sales.em_entity_accounts(entity_uuid, account_uuid)
    WHERE sys_deleted_at IS NULL;
CREATE INDEX idx_em_entity_accounts_account ON sales.em_entity_accounts(account_uuid);
";

const ORDERS_SQL: &str = r"
CREATE TABLE sales.om_sales_orders (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    account_uuid UUID NOT NULL REFERENCES sales.acc_accounts(uuid),
    invoice_uuid UUID,
    owner_uuid UUID REFERENCES sales.sys_users(uuid),
    approved_by_uuid UUID REFERENCES sales.sys_users(uuid),
    approved_on DATE,
    transacted_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE TABLE sales.om_order_items (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    order_uuid UUID NOT NULL REFERENCES sales.om_sales_orders(uuid),
    product_list_item_uuid UUID NOT NULL REFERENCES sales.pm_product_list_items(uuid),
    owner_uuid UUID REFERENCES sales.sys_users(uuid),
    adjusted_by_uuid UUID REFERENCES sales.sys_users(uuid),
    original_price NUMERIC(10, 2) NOT NULL,
    adjustment_type VARCHAR(16),
    price_adjustment NUMERIC(10, 2),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_om_order_items_price CHECK (original_price > 0),
    CONSTRAINT chk_om_order_items_adjustment CHECK (price_adjustment > 0),
    CONSTRAINT chk_om_order_items_adjustment_type
        CHECK (adjustment_type IN ('dollar', 'percentage'))
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE sales.om_invoices (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    order_uuid UUID NOT NULL REFERENCES sales.om_sales_orders(uuid),
    sys_value_status_uuid UUID,
    transacted_on DATE,
    posted_on DATE,
    paid_on DATE,
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID
);

CREATE UNIQUE INDEX uq_om_invoices_order ON sales.om_invoices(order_uuid) WHERE sys_deleted_at IS NULL;

ALTER TABLE sales.om_sales_orders
    ADD CONSTRAINT fk_om_sales_orders_invoice
    FOREIGN KEY (invoice_uuid) REFERENCES sales.om_invoices(uuid);

CREATE TABLE sales.om_invoice_items (
    id SERIAL PRIMARY KEY,
    uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
    invoice_uuid UUID NOT NULL REFERENCES sales.om_invoices(uuid),
    order_item_uuid UUID REFERENCES sales.om_order_items(uuid),
    product_list_item_uuid UUID NOT NULL REFERENCES sales.pm_product_list_items(uuid),
    quantity INTEGER NOT NULL DEFAULT 1,
    owner_uuid UUID REFERENCES sales.sys_users(uuid),
    original_price NUMERIC(10, 2) NOT NULL,
    adjustment_type VARCHAR(16),
    price_adjustment NUMERIC(10, 2),
    sys_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    sys_created_by UUID,
    sys_updated_at TIMESTAMPTZ,
    sys_updated_by UUID,
    sys_deleted_at TIMESTAMPTZ,
    sys_deleted_by UUID,

    CONSTRAINT chk_om_invoice_items_quantity CHECK (quantity >= 1),
    CONSTRAINT chk_om_invoice_items_price CHECK (original_price > 0),
    CONSTRAINT chk_om_invoice_items_adjustment CHECK (price_adjustment > 0),
    CONSTRAINT chk_om_invoice_items_adjustment_type
        CHECK (adjustment_type IN ('dollar', 'percentage'))
);
";

const DROP_SCHEMA_SQL: &str = r"
DROP SCHEMA IF EXISTS sales CASCADE;
";
