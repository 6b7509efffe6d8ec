//! Integration tests for the logging system
//!
//! These tests swap the process-wide logger and run serially.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests


use backend_test_utils::{create_host_heap, small_config, CaptureLogger};
use galaxy_3d_descriptor_arena::galaxy3d::arena::DescriptorCategory;
use galaxy_3d_descriptor_arena::galaxy3d::device::SamplerDesc;
use galaxy_3d_descriptor_arena::galaxy3d::log::{self, LogSeverity};
use galaxy_3d_descriptor_arena::galaxy3d::{BitPool, Error};
use serial_test::serial;

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);

    log::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    log::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    log::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert!(captured.iter().all(|entry| entry.source == "test::module"));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);

    log::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some("test_file.rs"));
        assert_eq!(captured[0].line, Some(42));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);

    log::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    log::reset_logger();
    log::log(LogSeverity::Info, "test", "Message 2".to_string());

    // Still only one message
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);
    log::set_min_severity(LogSeverity::Trace);

    log::log(LogSeverity::Trace, "test", "Trace message".to_string());
    log::log(LogSeverity::Debug, "test", "Debug message".to_string());
    assert_eq!(entries.lock().unwrap().len(), 2);

    log::set_min_severity(LogSeverity::Warn);
    assert!(!log::enabled(LogSeverity::Info));
    log::log(LogSeverity::Info, "test", "Dropped".to_string());
    log::log(LogSeverity::Warn, "test", "Kept".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[2].message, "Kept");
    }

    log::set_min_severity(LogSeverity::Info);
    log::reset_logger();
}

// ============================================================================
// ALLOCATOR LOGGING
// ============================================================================

#[test]
#[serial]
fn test_integration_exhaustion_is_logged_with_location() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);

    let mut pool = BitPool::new(0, 8, 1).unwrap();
    pool.allocate().unwrap();
    let result = pool.allocate();
    assert!(matches!(result, Err(Error::Exhausted(_))));

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Error)
            .expect("exhaustion should be logged");
        assert_eq!(error.source, "galaxy3d::BitPool");
        assert!(error.file.is_some());
        assert!(error.line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_heap_trace_logs() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);
    log::set_min_severity(LogSeverity::Trace);

    let (mut heap, _host) = create_host_heap(&small_config());
    let slot = heap.bind_sampler(SamplerDesc::default()).unwrap();
    heap.free_descriptor(slot).unwrap();
    assert_eq!(heap.available(DescriptorCategory::Sampler).unwrap(), 4);

    log::set_min_severity(LogSeverity::Info);

    {
        let captured = entries.lock().unwrap();
        let heap_traces = captured
            .iter()
            .filter(|entry| entry.source == "galaxy3d::DescriptorHeap" && entry.severity == LogSeverity::Trace)
            .count();
        assert_eq!(heap_traces, 2);
    }

    drop(heap);
    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_heap_teardown_warns_about_leaks() {
    let (capture, entries) = CaptureLogger::new();
    log::set_logger(capture);

    let (mut heap, _host) = create_host_heap(&small_config());
    heap.create_buffer(&backend_test_utils::uniform_buffer_desc(256)).unwrap();
    heap.create_image(&backend_test_utils::texture_desc(16, 16)).unwrap();
    drop(heap);

    {
        let captured = entries.lock().unwrap();
        let warnings: Vec<_> = captured
            .iter()
            .filter(|entry| entry.severity == LogSeverity::Warn)
            .map(|entry| entry.message.clone())
            .collect();
        assert_eq!(warnings.len(), 2, "{:?}", warnings);
        assert!(warnings.iter().any(|message| message.contains("buffers")));
        assert!(warnings.iter().any(|message| message.contains("images")));
    }

    log::reset_logger();
}
