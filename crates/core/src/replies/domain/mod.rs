pub mod reply_book;
