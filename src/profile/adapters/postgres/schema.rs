//! Diesel schema for profile persistence.

diesel::table! {
    /// Actor profiles with optional address and location.
    profiles (id) {
        /// Actor identifier issued by the identity gateway.
        id -> Uuid,
        /// Marketplace role.
        #[max_length = 20]
        role -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Contact email.
        #[max_length = 255]
        email -> Varchar,
        /// Street and number as typed.
        address -> Nullable<Text>,
        /// City as typed.
        #[max_length = 255]
        city -> Nullable<Varchar>,
        /// State code as typed.
        #[max_length = 50]
        state -> Nullable<Varchar>,
        /// Postal code as typed.
        #[max_length = 20]
        zip_code -> Nullable<Varchar>,
        /// Latitude in decimal degrees.
        latitude -> Nullable<Float8>,
        /// Longitude in decimal degrees.
        longitude -> Nullable<Float8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
