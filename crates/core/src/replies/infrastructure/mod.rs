pub mod canned_reply_book;
