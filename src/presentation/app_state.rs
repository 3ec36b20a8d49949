// Application state for HTTP handlers
use crate::application::greenhouse_service::GreenhouseService;
use crate::application::rover_service::RoverService;

#[derive(Clone)]
pub struct AppState {
    pub greenhouse_service: GreenhouseService,
    pub rover_service: RoverService,
}
