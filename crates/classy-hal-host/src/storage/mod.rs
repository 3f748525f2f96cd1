pub mod file_flash;
pub mod flash_record;
