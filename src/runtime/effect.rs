use crate::navigation::NavigationRequest;
use crate::runtime::scheduler::SchedulerCommand;
use crate::search::LookupRequest;

#[derive(Debug, Clone)]
pub enum Effect {
    Schedule(SchedulerCommand),
    Lookup(LookupRequest),
    Navigate(NavigationRequest),
    RequestRender,
}
