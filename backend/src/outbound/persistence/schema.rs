//! Diesel table definitions.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Restaurant catalogue. Read-only for this service.
    restaurants (id) {
        id -> Uuid,
        name -> Text,
        category -> Text,
        location -> Text,
        logo_asset_id -> Nullable<Text>,
        barcode_asset_id -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per enrolled user.
    user_rotations (user_id) {
        user_id -> Uuid,
        /// Pinned restaurant ids.
        favourite_ids -> Array<Uuid>,
        /// Rotation snapshot: an array of at most ten entries.
        rotation -> Jsonb,
        refreshed_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}
