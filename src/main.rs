#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> _ {
    suppression_admin::init_logger();
    log::info!("Starting SES suppression list admin");

    suppression_admin::rocket()
}
