// Mirrors sql/int_overflow_check_results.sql.

diesel::table! {
    int_overflow_check_results (id) {
        id -> Integer,
        hostname -> Varchar,
        dbname -> Varchar,
        table_name -> Varchar,
        column_name -> Varchar,
        max_size -> Unsigned<BigInt>,
        percentage -> Double,
        reason -> Varchar,
        timestamp -> Timestamp,
    }
}
