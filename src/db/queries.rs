//! Database queries for the pricing reference data

use sqlx::PgPool;

use crate::error::Result;
use crate::pricing::models::{CatalogRow, PricingSettingsRow};
use crate::pricing::{CatalogEntry, PricingSettings};

/// Load every available catalog entry
pub async fn load_catalog(pool: &PgPool) -> Result<Vec<CatalogEntry>> {
    let rows = sqlx::query_as::<_, CatalogRow>(
        r#"
        SELECT
            code,
            name,
            width_cm,
            height_cm,
            price_1w,
            price_2w,
            price_3w,
            price_4w,
            purchase_price,
            replacement_cost,
            active,
            deleted_at
        FROM mat_price_catalog
        WHERE active = true
          AND deleted_at IS NULL
        ORDER BY width_cm * height_cm, code
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter(CatalogRow::is_available)
        .map(CatalogRow::into_entry)
        .collect())
}

/// Latest pricing settings row layered over `base`, or `base` when the table is empty
pub async fn load_pricing_settings(
    pool: &PgPool,
    base: PricingSettings,
) -> Result<PricingSettings> {
    let row = sqlx::query_as::<_, PricingSettingsRow>(
        r#"
        SELECT
            special_shape_multiplier,
            optibrush_special_shape_multiplier,
            purchase_price_per_m2,
            rental_price_per_m2,
            optibrush_tier_table,
            updated_at
        FROM mat_pricing_settings
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(row) => row.apply_to(base),
        None => base,
    })
}
