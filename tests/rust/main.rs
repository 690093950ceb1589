mod chat_model;
mod classifier;
mod pipeline;
