//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique ignoring case through the
    /// `users_email_lower_key` index.
    users (id) {
        id -> Int8,
        email -> Varchar,
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        phone -> Nullable<Varchar>,
        role -> Varchar,
        image -> Nullable<Varchar>,
        is_active -> Bool,
        /// Outstanding password-reset token, cleared once used.
        reset_token -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named groups a user belongs to, e.g. the administrator group.
    user_groups (user_id, group_name) {
        user_id -> Int8,
        group_name -> Varchar,
    }
}

diesel::table! {
    ads (id) {
        id -> Int8,
        title -> Varchar,
        price -> Int8,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        author_id -> Nullable<Int8>,
    }
}

diesel::table! {
    reviews (id) {
        id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
        ad_id -> Int8,
        author_id -> Nullable<Int8>,
    }
}

diesel::joinable!(user_groups -> users (user_id));
diesel::joinable!(ads -> users (author_id));
diesel::joinable!(reviews -> ads (ad_id));

diesel::allow_tables_to_appear_in_same_query!(users, user_groups, ads, reviews);
