//! Runs alone in its own binary: it lowers RLIMIT_NOFILE for the whole process.

use nethelpers::{Family, SockType, raw_errno, start_reuseport_server};

fn open_fd_count() -> usize {
	std::fs::read_dir("/proc/self/fd").unwrap().count()
}

fn nofile_limit() -> libc::rlimit {
	let mut limit: libc::rlimit = unsafe { std::mem::zeroed() };
	assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) }, 0);
	limit
}

fn set_nofile_limit(limit: &libc::rlimit) {
	assert_eq!(unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, limit) }, 0);
}

#[test]
fn group_failing_midway_closes_earlier_listeners() {
	let before = open_fd_count();
	let saved = nofile_limit();

	// Room for a few listeners, not ten.
	let lowered = libc::rlimit {
		rlim_cur: (before + 3) as libc::rlim_t,
		rlim_max: saved.rlim_max,
	};
	set_nofile_limit(&lowered);
	let result = start_reuseport_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0, 10);
	set_nofile_limit(&saved);

	let err = result.unwrap_err();
	assert_eq!(raw_errno(&err), libc::EMFILE);
	assert_eq!(open_fd_count(), before);
}
