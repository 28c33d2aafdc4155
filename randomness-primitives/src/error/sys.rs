use super::ErrorKind;

cfg_match::cfg_match! {
    target_os = "linux" => {
        pub fn kind_from_raw_os_error(errno: i32) -> ErrorKind {
            use linux_errno::Error as Errno;
            if errno.try_into().ok().and_then(Errno::new).is_none() {
                return ErrorKind::__Internal;
            }

            match errno {
                libc::EINTR => ErrorKind::Interrupted,
                libc::EAGAIN => ErrorKind::WouldBlock,
                libc::ENOSYS | libc::EOPNOTSUPP => ErrorKind::SourceUnavailable,
                libc::ENOENT | libc::ENODEV | libc::ENXIO => ErrorKind::SourceUnavailable,
                libc::EPERM | libc::EACCES => ErrorKind::PermissionDenied,
                libc::EINVAL => ErrorKind::InvalidInput,
                libc::ENOMEM => ErrorKind::OutOfMemory,
                _ => ErrorKind::__Uncategorized,
            }
        }
    }
    _ => {
        pub fn kind_from_raw_os_error(errno: i32) -> ErrorKind {
            match errno {
                0 => ErrorKind::__Internal,
                _ => ErrorKind::__Uncategorized,
            }
        }
    }
}
