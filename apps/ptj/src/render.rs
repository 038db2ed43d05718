use marketplace::contract::model::{
    InboxEntry, JobListing, NavTarget, Screen, StudentProfile, View,
};
use marketplace::Shell;

pub fn status(shell: &Shell) {
    match shell.user() {
        Some(user) => println!(
            "Signed in as {} ({}, {})",
            user.display_name(),
            user.email,
            user.mode
        ),
        None => println!("Not signed in (browsing as {})", shell.state().guest_mode),
    }
    match shell.current_view() {
        View::Screen(screen) => println!("Screen: {screen}"),
        View::EmployerPreview => {
            println!(
                "Screen: hire talent. Sign in as an employer to post jobs and read applications."
            )
        }
    }
    println!(
        "Jobs: {}  Messages: {}  Theme: {:?}",
        shell.feed_jobs().len(),
        shell.state().messages.len(),
        shell.state().theme
    );
    nav(shell);
}

pub fn nav(shell: &Shell) {
    let items: Vec<String> = shell
        .nav_items()
        .into_iter()
        .map(|item| {
            let target = match item.target {
                NavTarget::Screen(s) => s.to_string(),
                NavTarget::SwitchMode(m) => format!("mode {m}"),
                NavTarget::OpenAuth => "login".to_string(),
            };
            let marker = if item.active { "*" } else { " " };
            format!("{marker}{} [{target}]", item.label)
        })
        .collect();
    println!("Nav: {}", items.join("  "));
}

pub fn signed_in(shell: &Shell, screen: Screen) {
    if let Some(user) = shell.user() {
        println!("Welcome, {}! Showing {screen}.", user.display_name());
    }
}

pub fn jobs(jobs: &[JobListing]) {
    if jobs.is_empty() {
        println!("No listings yet.");
        return;
    }
    for job in jobs {
        println!(
            "{:<10} {:<28} {:<24} {:<16} €{:.2}-€{:.2}/h  closes {}",
            job.id,
            job.title,
            job.company,
            job.location,
            job.salary_min,
            job.salary_max,
            job.deadline
        );
    }
}

pub fn inbox(entries: &[InboxEntry]) {
    if entries.is_empty() {
        println!("No messages yet.");
        return;
    }
    for entry in entries {
        let m = &entry.message;
        let unread = if m.is_read { " " } else { "•" };
        println!(
            "{unread} {} | {} | {}\n    {}",
            m.timestamp.format("%Y-%m-%d %H:%M"),
            entry.job_title,
            m.student_name,
            m.text
        );
    }
}

pub fn profile(p: &StudentProfile) {
    println!("[{}] {} {}", p.initials(), p.first_name, p.last_name);
    println!("  {} | {}", p.email, p.phone);
    println!("  Born {}", p.dob);
    println!("  {} at {}", p.degree, p.university);
    println!("  Bio: {}", p.bio);
    println!("  Skills: {}", p.skills.join(", "));
    for (i, exp) in p.experience.iter().enumerate() {
        println!("  #{i} {} @ {} ({})", exp.role, exp.company, exp.period);
    }
    if !p.portfolio_url.is_empty() {
        println!("  Portfolio: {}", p.portfolio_url);
    }
    if !p.linked_in_url.is_empty() {
        println!("  LinkedIn: {}", p.linked_in_url);
    }
}
