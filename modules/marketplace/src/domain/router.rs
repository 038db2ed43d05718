//! Role-gated screen resolution.
//!
//! Every `(user, guest mode, requested screen)` triple maps to exactly one
//! screen; a request outside the caller's allowed set silently resolves to
//! the role default.

use crate::contract::model::{NavItem, NavTarget, Screen, User, UserMode, View};

const STUDENT_SCREENS: &[Screen] = &[Screen::Feed, Screen::Profile, Screen::Tracker];
const EMPLOYER_SCREENS: &[Screen] = &[Screen::Dashboard, Screen::Inbox, Screen::CreateJob];

/// Screens reachable by a signed-in user of `mode`. The two sets are disjoint.
pub fn allowed_screens(mode: UserMode) -> &'static [Screen] {
    match mode {
        UserMode::Student => STUDENT_SCREENS,
        UserMode::Employer => EMPLOYER_SCREENS,
    }
}

pub fn default_screen(mode: UserMode) -> Screen {
    match mode {
        UserMode::Student => Screen::Feed,
        UserMode::Employer => Screen::Dashboard,
    }
}

pub fn is_allowed(mode: UserMode, screen: Screen) -> bool {
    allowed_screens(mode).contains(&screen)
}

/// Decide the screen actually shown.
///
/// Guests never reach a role-gated screen: they get the default of the
/// active mode toggle.
pub fn resolve_screen(user: Option<&User>, guest_mode: UserMode, requested: Screen) -> Screen {
    match user {
        None => default_screen(guest_mode),
        Some(u) if is_allowed(u.mode, requested) => requested,
        Some(u) => default_screen(u.mode),
    }
}

pub fn resolve_view(user: Option<&User>, guest_mode: UserMode, requested: Screen) -> View {
    match (user, guest_mode) {
        (None, UserMode::Employer) => View::EmployerPreview,
        _ => View::Screen(resolve_screen(user, guest_mode, requested)),
    }
}

/// Bottom-bar affordances for the current state.
pub fn nav_items(user: Option<&User>, guest_mode: UserMode, current: Screen) -> Vec<NavItem> {
    let screen_item = |label, screen| NavItem {
        label,
        target: NavTarget::Screen(screen),
        active: current == screen,
    };

    match user {
        None => vec![
            NavItem {
                label: "Find Job",
                target: NavTarget::SwitchMode(UserMode::Student),
                active: guest_mode == UserMode::Student,
            },
            NavItem {
                label: "Hire Talent",
                target: NavTarget::SwitchMode(UserMode::Employer),
                active: guest_mode == UserMode::Employer,
            },
            NavItem {
                label: "Login",
                target: NavTarget::OpenAuth,
                active: false,
            },
        ],
        Some(u) if u.is_student() => vec![
            screen_item("Explore", Screen::Feed),
            screen_item("My Apps", Screen::Tracker),
            screen_item("Profile", Screen::Profile),
        ],
        Some(_) => vec![
            screen_item("Console", Screen::Dashboard),
            screen_item("Inbox", Screen::Inbox),
            screen_item("Post", Screen::CreateJob),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(mode: UserMode) -> User {
        User {
            mode,
            email: "someone@example.com".into(),
            student_id: None,
            employer_id: None,
            token: "t".into(),
            first_name: None,
            last_name: None,
            university: None,
            company_name: None,
        }
    }

    #[test]
    fn role_sets_are_disjoint_and_cover_all_screens() {
        for screen in Screen::ALL {
            let student = is_allowed(UserMode::Student, screen);
            let employer = is_allowed(UserMode::Employer, screen);
            assert!(student ^ employer, "{screen} must belong to exactly one role");
        }
    }

    #[test]
    fn resolution_is_total_and_stays_inside_role() {
        for mode in [UserMode::Student, UserMode::Employer] {
            let u = user(mode);
            for requested in Screen::ALL {
                for guest_mode in [UserMode::Student, UserMode::Employer] {
                    let resolved = resolve_screen(Some(&u), guest_mode, requested);
                    assert!(is_allowed(mode, resolved));
                    assert_eq!(resolved, resolve_screen(Some(&u), guest_mode, requested));
                    if is_allowed(mode, requested) {
                        assert_eq!(resolved, requested);
                    } else {
                        assert_eq!(resolved, default_screen(mode));
                    }
                }
            }
        }
    }

    #[test]
    fn students_never_reach_employer_screens() {
        let student = user(UserMode::Student);
        for requested in [Screen::Dashboard, Screen::Inbox, Screen::CreateJob] {
            assert_eq!(
                resolve_screen(Some(&student), UserMode::Student, requested),
                Screen::Feed
            );
        }
    }

    #[test]
    fn employers_never_reach_student_screens() {
        let employer = user(UserMode::Employer);
        for requested in [Screen::Feed, Screen::Profile, Screen::Tracker] {
            assert_eq!(
                resolve_screen(Some(&employer), UserMode::Employer, requested),
                Screen::Dashboard
            );
        }
    }

    #[test]
    fn guests_get_the_toggle_default() {
        for requested in Screen::ALL {
            assert_eq!(resolve_screen(None, UserMode::Student, requested), Screen::Feed);
            assert_eq!(
                resolve_view(None, UserMode::Student, requested),
                View::Screen(Screen::Feed)
            );
            assert_eq!(resolve_view(None, UserMode::Employer, requested), View::EmployerPreview);
        }
    }

    #[test]
    fn nav_items_follow_role() {
        let guest = nav_items(None, UserMode::Employer, Screen::Dashboard);
        assert_eq!(guest.len(), 3);
        assert!(guest[1].active);
        assert_eq!(guest[2].target, NavTarget::OpenAuth);

        let employer = user(UserMode::Employer);
        let items = nav_items(Some(&employer), UserMode::Employer, Screen::Inbox);
        let active: Vec<_> = items.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].target, NavTarget::Screen(Screen::Inbox));
        assert!(items.iter().all(|i| match i.target {
            NavTarget::Screen(s) => is_allowed(UserMode::Employer, s),
            _ => false,
        }));
    }
}
