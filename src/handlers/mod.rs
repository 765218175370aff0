// handlers/mod.rs - route handlers grouped by resource
//
// body:    lenient JSON body extractor shared by the write routes
// service: public overview and health
// users:   signup/login (public), profile and logout (session required)
// todos:   per-user to-do items (session required)
pub mod body;
pub mod service;
pub mod todos;
pub mod users;
