//! Diesel schema for job persistence.

diesel::table! {
    /// Posted jobs and their lifecycle state.
    jobs (id) {
        /// Job identifier.
        id -> Uuid,
        /// Employer who posted the job.
        employer_id -> Uuid,
        /// Diarist assigned on acceptance.
        diarist_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Listing title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Kind of cleaning requested.
        #[max_length = 100]
        service_type -> Varchar,
        /// Street address of the work.
        address -> Text,
        /// Offered price in cents.
        price_cents -> Int8,
        /// Expected duration in minutes.
        duration_minutes -> Int4,
        /// Scheduled start.
        scheduled_at -> Timestamptz,
        /// Latitude in decimal degrees.
        latitude -> Nullable<Float8>,
        /// Longitude in decimal degrees.
        longitude -> Nullable<Float8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last transition timestamp.
        updated_at -> Timestamptz,
    }
}
