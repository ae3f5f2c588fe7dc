use log::debug;

use crate::session::Session;

/// Every screen the app can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Farmers,
    FarmerDetail { farmer_id: String },
    AddFarmer,
    CheckIn,
    FaceEnrollmentWelcome,
    FaceEnrollment { farmer_id: String, farmer_name: String },
    CoffeeBeans,
    CoffeeLeaves,
    Map,
    Profile,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Farmers => "Farmers",
            Route::FarmerDetail { .. } => "Farmer Details",
            Route::AddFarmer => "Add Farmer",
            Route::CheckIn => "Check In / Out",
            Route::FaceEnrollmentWelcome => "Face Enrollment",
            Route::FaceEnrollment { .. } => "Enroll Face",
            Route::CoffeeBeans => "Coffee Beans",
            Route::CoffeeLeaves => "Coffee Leaves",
            Route::Map => "Attendance Map",
            Route::Profile => "Profile",
        }
    }
}

/// What a screen asks the shell to do after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Back { message: Option<String> },
    To(Route),
}

/// Stack navigator gated on the session: while logged out the only
/// reachable route is [`Route::Login`], while logged in the root is the
/// dashboard.
#[derive(Debug, Clone)]
pub struct Navigator {
    session: Session,
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            stack: Vec::new(),
        }
    }

    fn root(&self) -> Route {
        if self.session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        }
    }

    /// The route on top of the stack. A lapsed session empties the stack, so
    /// the next login starts from the dashboard.
    pub fn current(&mut self) -> Route {
        if !self.session.is_authenticated() {
            if !self.stack.is_empty() {
                debug!("Session ended, dropping {} route(s)", self.stack.len());
                self.stack.clear();
            }
            return Route::Login;
        }
        self.stack.last().cloned().unwrap_or_else(|| self.root())
    }

    /// Opens `route`. Returns the route actually shown, which is the login
    /// screen for any protected route while logged out.
    pub fn push(&mut self, route: Route) -> Route {
        if route.requires_auth() && !self.session.is_authenticated() {
            debug!("Blocked {:?} without a session", route);
            self.stack.clear();
            return Route::Login;
        }
        if route == Route::Login && self.session.is_authenticated() {
            return self.current();
        }
        self.stack.push(route);
        self.current()
    }

    pub fn back(&mut self) -> Route {
        self.stack.pop();
        self.current()
    }

    pub fn apply(&mut self, navigation: Navigation) -> Route {
        match navigation {
            Navigation::Stay => self.current(),
            Navigation::Back { .. } => self.back(),
            Navigation::To(route) => self.push(route),
        }
    }

    /// Drops the history; called when the session changes hands.
    pub fn reset(&mut self) -> Route {
        self.stack.clear();
        self.root()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
