//! API integration tests
//!
//! Integration tests for the resource routes

mod crud_test;
