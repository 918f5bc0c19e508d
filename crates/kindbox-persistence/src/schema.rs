// Esquema Diesel para SQLite.
// Tablas: municipalities, donors, conversation_states
use diesel::allow_tables_to_appear_in_same_query;
diesel::table! {
    municipalities (id) {
        id -> Text,
        name -> Text,
    }
}
diesel::table! {
    donors (id) {
        id -> Text,
        user_id -> BigInt,
        name -> Text,
        phone_number -> Text,
        organization_name -> Nullable<Text>,
        municipality_id -> Text,
        registered_at_ts -> BigInt,
    }
}
diesel::table! {
    conversation_states (actor_id, namespace) {
        actor_id -> BigInt,
        namespace -> Text,
        state_tag -> Text,
        data -> Text,
        updated_at_ts -> BigInt,
    }
}
diesel::joinable!(donors -> municipalities (municipality_id));
allow_tables_to_appear_in_same_query!(municipalities, donors, conversation_states);
