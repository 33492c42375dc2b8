diesel::table! {
    call_sim_scoring (id) {
        id -> Int4,
        simulation_id -> Nullable<Varchar>,
        team_id -> Nullable<Uuid>,
        product_id -> Nullable<Varchar>,
        user_id -> Nullable<Varchar>,
        specialty -> Nullable<Varchar>,
        situation -> Nullable<Varchar>,
        adoption_continuum -> Nullable<Varchar>,
        mode -> Nullable<Varchar>,
        assessment_status -> Nullable<Varchar>,
        accuracy -> Nullable<Jsonb>,
        fluency -> Nullable<Jsonb>,
        conversation_data -> Nullable<Jsonb>,
        overall_score -> Nullable<Float8>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
        is_deleted -> Bool,
    }
}
