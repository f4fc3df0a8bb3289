//! Diesel table definitions matching `backend/migrations`.
//!
//! Keep in step with the migrations; `diesel print-schema` regenerates them
//! from a live database.

diesel::table! {
    /// Clients, both organic and provisioned; `source` tells them apart.
    demo_clients (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        source -> Text,
        display_name -> Text,
        /// Globally unique across every tenant.
        unique_identity -> Text,
        organization -> Nullable<Text>,
        personality_type -> Text,
        score_d -> Int2,
        score_i -> Int2,
        score_s -> Int2,
        score_c -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Staff members, both organic and provisioned.
    demo_staff (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        source -> Text,
        display_name -> Text,
        unique_identity -> Text,
        role -> Nullable<Text>,
        personality_type -> Text,
        score_d -> Int2,
        score_i -> Int2,
        score_s -> Int2,
        score_c -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One assessment per client, removed with its client.
    assessments (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        client_id -> Uuid,
        response_set -> Jsonb,
        score_d -> Int2,
        score_i -> Int2,
        score_s -> Int2,
        score_c -> Int2,
        dominant_type -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrichment output; refers to its client without a foreign key.
    insight_documents (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        client_id -> Uuid,
        status -> Text,
        content -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Engagement tracking owned by another subsystem, keyed by client.
    engagement_events (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        client_id -> Uuid,
        kind -> Text,
        occurred_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit of provisioning runs.
    provisioning_log (id) {
        id -> Int8,
        tenant_id -> Uuid,
        recorded_at -> Timestamptz,
        outcome -> Text,
        clients_created -> Nullable<Int4>,
        staff_created -> Nullable<Int4>,
        assessments_created -> Nullable<Int4>,
        insights_generated -> Nullable<Int4>,
        error_message -> Nullable<Text>,
    }
}

diesel::joinable!(assessments -> demo_clients (client_id));

diesel::allow_tables_to_appear_in_same_query!(
    demo_clients,
    demo_staff,
    assessments,
    insight_documents,
    engagement_events,
    provisioning_log,
);
