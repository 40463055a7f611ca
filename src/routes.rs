use actix_web::web;

pub mod characters;
pub mod items;
pub mod spells;
pub mod users;

// Single registration point so main() and the test harness build the
// same application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::me)
        .service(characters::list_characters)
        .service(characters::get_character)
        .service(characters::create_character)
        .service(characters::update_character)
        .service(characters::delete_character)
        .service(characters::attach_item)
        .service(characters::detach_item)
        .service(characters::attach_spell)
        .service(characters::detach_spell)
        .service(items::list_items)
        .service(items::get_item)
        .service(items::create_item)
        .service(items::delete_item)
        .service(spells::list_spells)
        .service(spells::get_spell)
        .service(spells::create_spell)
        .service(spells::delete_spell);
}
