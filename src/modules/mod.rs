pub mod bulk_delete;
