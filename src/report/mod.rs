pub mod html;
pub mod url_list;
