use super::inserted_id;
use crate::error::{DatabaseError, Result};
use consign_models::{NewProduct, Product, UpdateProduct};
use sqlx::{MySql, MySqlPool, QueryBuilder};

pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product> {
        let result = sqlx::query(
            r#"
            INSERT INTO products
                (name, description, category, net_price, sale_price, quantity,
                 consignee_id, date_added, status, brand, size)
            VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, CURDATE()), COALESCE(?, 'available'), ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.net_price)
        .bind(product.sale_price)
        .bind(product.quantity)
        .bind(product.consignee_id)
        .bind(product.date_added)
        .bind(&product.status)
        .bind(&product.brand)
        .bind(&product.size)
        .execute(&self.pool)
        .await?;

        self.find_by_id(inserted_id(&result)?).await
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY product_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE product_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Product", &id.to_string()))?;

        Ok(product)
    }

    /// Update the given fields. Column names come from this fixed list only.
    pub async fn update(&self, id: i32, update: &UpdateProduct) -> Result<Product> {
        let mut query_builder: QueryBuilder<MySql> =
            QueryBuilder::new("UPDATE products SET product_id = product_id");

        let mut has_updates = false;

        if let Some(ref name) = update.name {
            query_builder.push(", name = ");
            query_builder.push_bind(name);
            has_updates = true;
        }

        if let Some(ref description) = update.description {
            query_builder.push(", description = ");
            query_builder.push_bind(description);
            has_updates = true;
        }

        if let Some(ref category) = update.category {
            query_builder.push(", category = ");
            query_builder.push_bind(category);
            has_updates = true;
        }

        if let Some(net_price) = update.net_price {
            query_builder.push(", net_price = ");
            query_builder.push_bind(net_price);
            has_updates = true;
        }

        if let Some(sale_price) = update.sale_price {
            query_builder.push(", sale_price = ");
            query_builder.push_bind(sale_price);
            has_updates = true;
        }

        if let Some(quantity) = update.quantity {
            query_builder.push(", quantity = ");
            query_builder.push_bind(quantity);
            has_updates = true;
        }

        if let Some(consignee_id) = update.consignee_id {
            query_builder.push(", consignee_id = ");
            query_builder.push_bind(consignee_id);
            has_updates = true;
        }

        if let Some(date_added) = update.date_added {
            query_builder.push(", date_added = ");
            query_builder.push_bind(date_added);
            has_updates = true;
        }

        if let Some(ref status) = update.status {
            query_builder.push(", status = ");
            query_builder.push_bind(status);
            has_updates = true;
        }

        if let Some(ref brand) = update.brand {
            query_builder.push(", brand = ");
            query_builder.push_bind(brand);
            has_updates = true;
        }

        if let Some(ref size) = update.size {
            query_builder.push(", size = ");
            query_builder.push_bind(size);
            has_updates = true;
        }

        if has_updates {
            query_builder.push(" WHERE product_id = ");
            query_builder.push_bind(id);
            query_builder.build().execute(&self.pool).await?;
        }

        // MySQL reports zero affected rows for no-op updates, so existence is
        // checked by reading the row back
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Product", &id.to_string()));
        }

        Ok(())
    }
}
