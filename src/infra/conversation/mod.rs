pub mod sqlite_conversation_service;
