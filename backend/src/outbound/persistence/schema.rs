//! Diesel table definitions for the marketplace schema.
//!
//! Kept in lockstep with the SQL migrations under `migrations/`.

diesel::table! {
    users (email) {
        email -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    classes (id) {
        id -> Uuid,
        title -> Varchar,
        instructor_email -> Varchar,
        image_url -> Nullable<Varchar>,
        price_cents -> Int8,
        total_seats -> Int4,
        available_seats -> Int4,
        enrolled_count -> Int4,
        status -> Varchar,
        feedback -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    enrollment_intents (id) {
        id -> Uuid,
        student_email -> Varchar,
        class_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    payments (id) {
        id -> Uuid,
        student_email -> Varchar,
        class_id -> Uuid,
        intent_id -> Uuid,
        amount_cents -> Int8,
        charge_ref -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(enrollment_intents -> classes (class_id));
diesel::joinable!(payments -> classes (class_id));

diesel::allow_tables_to_appear_in_same_query!(users, classes, enrollment_intents, payments);
