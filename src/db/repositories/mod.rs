mod crowd_responses;
mod reading_sessions;
