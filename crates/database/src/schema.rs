//! Base schema of a tenant database.
//!
//! Every statement is `IF NOT EXISTS` so provisioning can be replayed, and
//! tables are addressed as `database`.`table` so the connection used for
//! provisioning keeps its own default schema.

/// Quote a MySQL identifier with backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn create_database(database: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
        quote_identifier(database)
    )
}

pub fn create_users_table(database: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.users (
            user_id INT AUTO_INCREMENT PRIMARY KEY,
            username VARCHAR(50) NOT NULL UNIQUE,
            email VARCHAR(100) NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            phone VARCHAR(20),
            first_name VARCHAR(50),
            last_name VARCHAR(50),
            role ENUM('admin', 'user') NOT NULL DEFAULT 'user',
            tenant_id VARCHAR(52) DEFAULT 'default',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
        )
        "#,
        quote_identifier(database)
    )
}

pub fn create_user_addresses_table(database: &str) -> String {
    let database = quote_identifier(database);
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {database}.user_addresses (
            address_id INT AUTO_INCREMENT PRIMARY KEY,
            user_id INT NOT NULL,
            address VARCHAR(255),
            city VARCHAR(50),
            state VARCHAR(50),
            postal_code VARCHAR(20),
            country VARCHAR(50),
            FOREIGN KEY (user_id) REFERENCES {database}.users(user_id) ON DELETE CASCADE
        )
        "#
    )
}

pub fn create_products_table(database: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.products (
            product_id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            description TEXT,
            category VARCHAR(50),
            net_price DOUBLE,
            sale_price DOUBLE,
            quantity INT NOT NULL DEFAULT 1,
            consignee_id INT,
            date_added DATE,
            status VARCHAR(20) NOT NULL DEFAULT 'available',
            brand VARCHAR(50),
            size VARCHAR(20),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        quote_identifier(database)
    )
}

/// Statements that bring `database` to the base schema, in execution order
pub fn provisioning_statements(database: &str) -> Vec<String> {
    vec![
        create_database(database),
        create_users_table(database),
        create_user_addresses_table(database),
        create_products_table(database),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("consignment_shopA"), "`consignment_shopA`");
        assert_eq!(quote_identifier("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_statements_are_replayable() {
        for statement in provisioning_statements("consignment_shopA") {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "not idempotent: {statement}"
            );
        }
    }

    #[test]
    fn test_database_created_before_tables() {
        let statements = provisioning_statements("consignment_shopA");
        assert!(statements[0].starts_with("CREATE DATABASE IF NOT EXISTS `consignment_shopA`"));
        assert!(statements[1].contains("`consignment_shopA`.users"));
        assert!(statements[2].contains("`consignment_shopA`.user_addresses"));
    }

    #[test]
    fn test_addresses_cascade_with_users() {
        let ddl = create_user_addresses_table("consignment_shopA");
        assert!(ddl.contains("REFERENCES `consignment_shopA`.users(user_id) ON DELETE CASCADE"));
    }
}
